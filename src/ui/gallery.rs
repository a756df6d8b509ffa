/// Thumbnail grid, pagination bar and the viewer pane
use iced::widget::{button, column, container, image, pick_list, row, text, Column, Row};
use iced::{Alignment, Element, Length};

use crate::state::data::{FileNode, MediaKind};
use crate::state::gallery::Gallery;
use crate::state::viewers::{ViewerArgs, ViewerId};
use crate::Message;

/// Human-readable size with a 1024 base, e.g. `1.5 KB`
pub fn format_bytes(bytes: u64, decimals: usize) -> String {
    const SIZES: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut exponent = 0;
    let mut scaled = bytes;
    while scaled >= 1024 && exponent < SIZES.len() - 1 {
        scaled /= 1024;
        exponent += 1;
    }
    let value = bytes as f64 / 1024_f64.powi(exponent as i32);

    let formatted = format!("{value:.decimals$}");
    let trimmed = if formatted.contains('.') {
        formatted.trim_end_matches('0').trim_end_matches('.')
    } else {
        formatted.as_str()
    };
    format!("{} {}", trimmed, SIZES[exponent])
}

fn tile(file: &FileNode) -> Element<'_, Message> {
    let preview: Element<'_, Message> = match file.kind {
        MediaKind::Image => image(image::Handle::from_path(&file.path))
            .width(Length::Fill)
            .height(Length::Fixed(120.0))
            .into(),
        MediaKind::Video => container(text("▶").size(48))
            .center_x(Length::Fill)
            .center_y(Length::Fixed(120.0))
            .into(),
    };

    let mut details = format_bytes(file.size, 2);
    if let Some(date) = &file.date_taken {
        details.push_str(" · ");
        details.push_str(date.get(..10).unwrap_or(date));
    }

    button(column![preview, text(&file.name).size(12), text(details).size(10)].spacing(4))
        .on_press(Message::OpenViewer(file.path.clone(), file.kind))
        .style(button::secondary)
        .width(Length::Fill)
        .padding(4)
        .into()
}

/// The current page laid out as a square-ish grid
pub fn view<'a>(gallery: &'a Gallery, page_sizes: &'a [usize]) -> Element<'a, Message> {
    let columns = gallery.grid_columns();
    let mut rows: Vec<Element<'a, Message>> = gallery
        .visible()
        .chunks(columns)
        .map(|chunk| {
            let mut cells: Vec<Element<'a, Message>> = chunk.iter().map(tile).collect();
            // Pad the last row so tiles keep their width
            while cells.len() < columns {
                cells.push(container(text("")).width(Length::Fill).into());
            }
            Row::with_children(cells).spacing(8).into()
        })
        .collect();
    // Short pages keep the full grid height
    while rows.len() < gallery.grid_rows() {
        rows.push(container(text("")).height(Length::Fill).into());
    }

    let grid = Column::with_children(rows).spacing(8).height(Length::Fill);

    let at_first = gallery.current_page() == 1;
    let at_last = gallery.current_page() == gallery.total_pages();

    let pager = row![
        button("<<").on_press_maybe((!at_first).then_some(Message::FirstPage)),
        button("<").on_press_maybe((!at_first).then_some(Message::PreviousPage)),
        text(gallery.page_label()),
        button(">").on_press_maybe((!at_last).then_some(Message::NextPage)),
        button(">>").on_press_maybe((!at_last).then_some(Message::LastPage)),
        text(format!("{} files", gallery.media().len())).size(12),
        pick_list(
            page_sizes,
            Some(gallery.items_per_page()),
            Message::PageSizeSelected
        ),
    ]
    .spacing(10)
    .align_y(Alignment::Center);

    column![grid, pager].spacing(10).padding(10).into()
}

/// A single opened file, replacing the grid until closed
pub fn viewer(id: ViewerId, args: &ViewerArgs) -> Element<'_, Message> {
    let content: Element<'_, Message> = match args.kind {
        MediaKind::Image => image(image::Handle::from_path(&args.path))
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
        MediaKind::Video => container(text(format!("▶ {}", args.path)).size(18))
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into(),
    };

    column![
        row![
            text(&args.path).size(14).width(Length::Fill),
            button("Close").on_press(Message::CloseViewer(id)),
        ]
        .align_y(Alignment::Center),
        content,
    ]
    .spacing(10)
    .padding(10)
    .into()
}
