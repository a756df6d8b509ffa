/// Native open/save dialogs. `None` always means the user cancelled.
use std::path::PathBuf;

use rfd::AsyncFileDialog;

pub async fn choose_directory() -> Option<PathBuf> {
    AsyncFileDialog::new()
        .set_title("Select Folder with Photos and Videos")
        .pick_folder()
        .await
        .map(|handle| handle.path().to_path_buf())
}

pub async fn choose_save_target() -> Option<PathBuf> {
    AsyncFileDialog::new()
        .set_title("Save Folder Structure")
        .add_filter("JSON Files", &["json"])
        .save_file()
        .await
        .map(|handle| handle.path().to_path_buf())
}

pub async fn choose_open_target() -> Option<PathBuf> {
    AsyncFileDialog::new()
        .set_title("Open Folder Structure")
        .add_filter("JSON Files", &["json"])
        .pick_file()
        .await
        .map(|handle| handle.path().to_path_buf())
}
