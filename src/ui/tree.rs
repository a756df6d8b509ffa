/// Folder tree panel
use iced::widget::{button, column, scrollable, text, Column};
use iced::{Element, Length, Theme};

use crate::state::selection::Selection;
use crate::Message;

type ButtonStyle = fn(&Theme, button::Status) -> button::Style;

/// Root label as a header, then every visible row indented by depth
pub fn view(root_label: String, selection: &Selection) -> Element<'_, Message> {
    let rows = selection.visible_rows().into_iter().map(move |index| {
        let entry = &selection.entries()[index];

        let marker = if !entry.is_folder() {
            "   "
        } else if selection.is_expanded(index) {
            "▾ "
        } else {
            "▸ "
        };
        let label = format!("{}{}{}", "    ".repeat(entry.depth), marker, entry.name);

        let style: ButtonStyle = if selection.is_selected(index) {
            button::primary
        } else {
            button::text
        };

        button(text(label).size(14))
            .on_press(Message::NodeClicked(index))
            .style(style)
            .width(Length::Fill)
            .padding([2, 6])
            .into()
    });

    let header = match selection.selected().len() {
        0 => root_label,
        n => format!("{root_label} ({n} selected)"),
    };

    let content = column![
        text(header).size(16),
        Column::with_children(rows).spacing(1),
    ]
    .spacing(6)
    .padding(8);

    scrollable(content).height(Length::Fill).into()
}
