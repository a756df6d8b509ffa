use iced::widget::{button, column, container, row, text, vertical_rule};
use iced::{event, keyboard, window, Alignment, Element, Event, Length, Subscription, Task, Theme};
use std::path::PathBuf;

mod config;
mod error;
mod media;
mod state;
mod ui;

use config::Settings;
use media::metadata::TagReader;
use state::data::{FolderNode, MediaKind};
use state::persist;
use state::selection::ClickModifiers;
use state::session::Session;
use state::viewers::{ViewerId, ViewerRegistry};

/// Main application state
struct MediaBrowser {
    /// The current tree with its selection and gallery
    session: Session,
    /// Files opened from the gallery
    viewers: ViewerRegistry,
    settings: Settings,
    reader: TagReader,
    /// Modifier keys currently held, applied to tree clicks
    modifiers: ClickModifiers,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked "New": pick a folder and scan it
    ScanFolder,
    /// Background scan finished (None if the dialog was cancelled)
    ScanComplete(Option<(PathBuf, FolderNode)>),
    SaveTree,
    /// Ok(false) if the dialog was cancelled
    SaveComplete(Result<bool, String>),
    OpenTree,
    /// None if the dialog was cancelled
    OpenComplete(Option<Result<FolderNode, String>>),
    NodeClicked(usize),
    ModifiersChanged(keyboard::Modifiers),
    FirstPage,
    PreviousPage,
    NextPage,
    LastPage,
    PageSizeSelected(usize),
    OpenViewer(String, MediaKind),
    CloseViewer(ViewerId),
}

impl MediaBrowser {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let settings = Settings::load();
        let reader = settings.tag_reader();

        log::info!("Media browser started (page size {})", settings.items_per_page);

        (
            MediaBrowser {
                session: Session::new(settings.items_per_page),
                viewers: ViewerRegistry::new(),
                settings,
                reader,
                modifiers: ClickModifiers::default(),
                status: "Ready. Choose a folder to scan.".to_string(),
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ScanFolder => {
                if !self.session.begin_task() {
                    return Task::none();
                }
                self.status = "Choosing folder...".to_string();

                let reader = self.reader.clone();
                let follow_links = self.settings.follow_links;
                Task::perform(
                    async move {
                        let folder = ui::dialogs::choose_directory().await?;
                        let tree = media::scanner::scan(&folder, &reader, follow_links).await;
                        Some((folder, tree))
                    },
                    Message::ScanComplete,
                )
            }
            Message::ScanComplete(result) => {
                self.session.finish_task();
                match result {
                    Some((folder, tree)) => {
                        self.status = format!("Scanned {}", folder.display());
                        self.session.replace_tree(tree, Some(folder));
                    }
                    None => self.status = "Scan cancelled.".to_string(),
                }
                Task::none()
            }
            Message::SaveTree => {
                let Some(tree) = self.session.tree().cloned() else {
                    self.status = "No folder loaded to save!".to_string();
                    return Task::none();
                };

                Task::perform(
                    async move {
                        let Some(target) = ui::dialogs::choose_save_target().await else {
                            return Ok(false);
                        };
                        persist::save_tree(&target, Some(&tree))
                            .map(|_| true)
                            .map_err(|e| e.to_string())
                    },
                    Message::SaveComplete,
                )
            }
            Message::SaveComplete(result) => {
                self.status = match result {
                    Ok(true) => "File saved successfully.".to_string(),
                    Ok(false) => "Save cancelled.".to_string(),
                    Err(e) => {
                        log::error!("Save failed: {}", e);
                        format!("Save failed: {}", e)
                    }
                };
                Task::none()
            }
            Message::OpenTree => {
                if !self.session.begin_task() {
                    return Task::none();
                }

                Task::perform(
                    async move {
                        let source = ui::dialogs::choose_open_target().await?;
                        Some(persist::load_tree(&source).map_err(|e| e.to_string()))
                    },
                    Message::OpenComplete,
                )
            }
            Message::OpenComplete(result) => {
                self.session.finish_task();
                match result {
                    Some(Ok(tree)) => {
                        self.status = format!("Opened {}", tree.name);
                        self.session.replace_tree(tree, None);
                    }
                    Some(Err(e)) => {
                        log::error!("Open failed: {}", e);
                        self.status = format!("Could not open folder structure: {}", e);
                    }
                    None => self.status = "Open cancelled.".to_string(),
                }
                Task::none()
            }
            Message::NodeClicked(index) => {
                self.session.click(index, self.modifiers);
                Task::none()
            }
            Message::ModifiersChanged(modifiers) => {
                self.modifiers = ClickModifiers {
                    toggle: modifiers.control() || modifiers.logo(),
                    range: modifiers.shift(),
                };
                Task::none()
            }
            Message::FirstPage => {
                self.session.gallery_mut().first_page();
                Task::none()
            }
            Message::PreviousPage => {
                self.session.gallery_mut().previous_page();
                Task::none()
            }
            Message::NextPage => {
                self.session.gallery_mut().next_page();
                Task::none()
            }
            Message::LastPage => {
                self.session.gallery_mut().last_page();
                Task::none()
            }
            Message::PageSizeSelected(size) => {
                self.session.gallery_mut().set_items_per_page(size);
                Task::none()
            }
            Message::OpenViewer(path, kind) => {
                let id = self.viewers.open(path, kind);
                log::debug!("Opened viewer {:?} ({} open)", id, self.viewers.len());
                Task::none()
            }
            Message::CloseViewer(id) => {
                if let Some(args) = self.viewers.close(id) {
                    log::debug!("Closed viewer for {}", args.path);
                }
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let busy = self.session.is_busy();
        let toolbar = row![
            button("New")
                .on_press_maybe((!busy).then_some(Message::ScanFolder))
                .padding(8),
            button("Save").on_press(Message::SaveTree).padding(8),
            button("Open")
                .on_press_maybe((!busy).then_some(Message::OpenTree))
                .padding(8),
            text(&self.status).size(14),
        ]
        .spacing(10)
        .align_y(Alignment::Center)
        .padding(10);

        let body: Element<Message> = match self.session.tree() {
            None => container(text("No folder loaded").size(20))
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into(),
            Some(tree) => {
                let main_pane = match self.viewers.latest() {
                    Some((id, args)) => ui::gallery::viewer(id, args),
                    None => ui::gallery::view(self.session.gallery(), &self.settings.page_sizes),
                };

                let root_label = self
                    .session
                    .root_path()
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| tree.name.clone());

                row![
                    container(ui::tree::view(root_label, self.session.selection()))
                        .width(Length::Fixed(300.0)),
                    vertical_rule(1),
                    container(main_pane).width(Length::Fill),
                ]
                .height(Length::Fill)
                .into()
            }
        };

        column![toolbar, body].into()
    }

    /// Track modifier keys so tree clicks can toggle or extend the selection
    fn subscription(&self) -> Subscription<Message> {
        event::listen_with(|event, _status, _window: window::Id| match event {
            Event::Keyboard(keyboard::Event::ModifiersChanged(modifiers)) => {
                Some(Message::ModifiersChanged(modifiers))
            }
            _ => None,
        })
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    iced::application("Media Browser", MediaBrowser::update, MediaBrowser::view)
        .subscription(MediaBrowser::subscription)
        .theme(MediaBrowser::theme)
        .window_size((1200.0, 800.0))
        .centered()
        .run_with(MediaBrowser::new)
}
