use iced::widget::image;
use iced::{Element, Task, Theme};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::rc::Rc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod gallery;
mod state;
mod ui;

use crate::config::StudioConfig;
use crate::error::GalleryError;
use crate::gallery::encode::{self, EncodedBatch};
use crate::gallery::{AdminGallery, ClientGallery, Download, FixedCredentials};
use crate::state::{AccessCode, Library, PhotoRecord};

type SharedStore = Rc<Library>;
type SharedCredentials = Rc<FixedCredentials>;

/// Which page is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Client,
    Admin,
}

/// Main application state
pub struct Studio {
    config: StudioConfig,
    library: SharedStore,
    screen: Screen,
    admin: AdminGallery<SharedStore, SharedCredentials>,
    client: ClientGallery<SharedStore, SharedCredentials>,

    // Admin portal form
    admin_password: String,
    admin_error: Option<String>,
    admin_notice: Option<String>,
    upload_code: String,
    selected_files: Vec<PathBuf>,
    /// Code the in-flight upload was validated against
    uploading: Option<AccessCode>,
    /// Codes holding photos that the overview does not list
    hidden_codes: Vec<AccessCode>,

    // Client gallery form
    client_code: String,
    client_error: Option<String>,

    /// Decoded image handles keyed by record id
    previews: HashMap<String, image::Handle>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    Navigate(Screen),

    AdminPasswordChanged(String),
    AdminLogin,
    AdminLogout,
    UploadCodeChanged(String),
    PickFiles,
    PickFolder,
    /// Files chosen in the picker (empty when cancelled)
    FilesPicked(Vec<PathBuf>),
    RemoveSelected(usize),
    Upload,
    UploadEncoded(EncodedBatch),
    DeleteRequested { id: String, code: String },
    DeleteConfirmed { id: String, code: String, confirmed: bool },

    ClientCodeChanged(String),
    ClientLogin,
    ClientLogout,
    ClientRefresh,
    Download(String),
    DownloadSaved(Result<Option<PathBuf>, String>),
    /// The spinner delay for a download ran out
    DownloadSettled(String),
}

impl Message {
    /// Whether handling this message can change what is stored or shown,
    /// so previews and the hidden-code list need another look
    fn changes_gallery(&self) -> bool {
        match self {
            Message::Navigate(_)
            | Message::AdminLogin
            | Message::AdminLogout
            | Message::UploadEncoded(_)
            | Message::ClientLogin
            | Message::ClientLogout
            | Message::ClientRefresh => true,
            Message::DeleteConfirmed { confirmed, .. } => *confirmed,
            _ => false,
        }
    }
}

impl Studio {
    /// Create the application over an opened store, restoring saved sessions
    fn new(config: StudioConfig, library: SharedStore) -> (Self, Task<Message>) {
        let credentials = Rc::new(FixedCredentials::from_config(&config));

        let mut admin = AdminGallery::new(library.clone(), credentials.clone(), &config.aggregate_codes);
        let mut client = ClientGallery::new(library.clone(), credentials);

        if let Err(e) = admin.restore() {
            warn!("Could not restore admin session: {}", e);
        }
        if let Err(e) = client.restore() {
            warn!("Could not restore client session: {}", e);
        }

        let mut studio = Studio {
            config,
            library,
            screen: Screen::Home,
            admin,
            client,
            admin_password: String::new(),
            admin_error: None,
            admin_notice: None,
            upload_code: String::new(),
            selected_files: Vec::new(),
            uploading: None,
            hidden_codes: Vec::new(),
            client_code: String::new(),
            client_error: None,
            previews: HashMap::new(),
        };
        studio.sync_previews();
        studio.sync_hidden_codes();

        info!("🎨 Studio Gallery ready ({})", studio.library.path().display());
        (studio, Task::none())
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        let changes_gallery = message.changes_gallery();
        let task = match message {
            Message::Navigate(screen) => {
                self.screen = screen;
                self.admin_error = None;
                self.client_error = None;
                Task::none()
            }

            Message::AdminPasswordChanged(password) => {
                self.admin_password = password;
                Task::none()
            }
            Message::AdminLogin => {
                self.admin_error = None;
                if let Err(e) = self.admin.login(&self.admin_password) {
                    self.admin_error = Some(e.to_string());
                }
                Task::none()
            }
            Message::AdminLogout => {
                if let Err(e) = self.admin.logout() {
                    error!("Admin logout failed: {}", e);
                }
                self.admin_password.clear();
                self.admin_notice = None;
                self.admin_error = None;
                Task::none()
            }
            Message::UploadCodeChanged(code) => {
                self.upload_code = code.to_uppercase();
                Task::none()
            }
            Message::PickFiles => Task::perform(pick_files(), Message::FilesPicked),
            Message::PickFolder => Task::perform(pick_folder(), Message::FilesPicked),
            Message::FilesPicked(files) => {
                if !files.is_empty() {
                    info!("Selected {} file(s)", files.len());
                    self.selected_files = files;
                    self.admin_notice = None;
                }
                Task::none()
            }
            Message::RemoveSelected(index) => {
                if index < self.selected_files.len() {
                    self.selected_files.remove(index);
                }
                Task::none()
            }
            Message::Upload => {
                self.admin_error = None;
                self.admin_notice = None;
                match self.admin.validate_upload(&self.upload_code, self.selected_files.len()) {
                    Ok(code) => {
                        self.uploading = Some(code);
                        Task::perform(
                            encode::encode_files(self.selected_files.clone()),
                            Message::UploadEncoded,
                        )
                    }
                    Err(e) => {
                        self.admin_error = Some(e.to_string());
                        Task::none()
                    }
                }
            }
            Message::UploadEncoded(batch) => {
                self.finish_upload(batch);
                Task::none()
            }
            Message::DeleteRequested { id, code } => {
                Task::perform(confirm_delete(), move |confirmed| Message::DeleteConfirmed {
                    id: id.clone(),
                    code: code.clone(),
                    confirmed,
                })
            }
            Message::DeleteConfirmed { id, code, confirmed } => {
                if confirmed {
                    if let Err(e) = self.admin.delete(&id, &code) {
                        self.admin_error = Some(e.to_string());
                    }
                }
                Task::none()
            }

            Message::ClientCodeChanged(code) => {
                self.client_code = code;
                Task::none()
            }
            Message::ClientLogin => {
                self.client_error = None;
                if let Err(e) = self.client.login(&self.client_code) {
                    self.client_error = Some(e.to_string());
                }
                Task::none()
            }
            Message::ClientLogout => {
                if let Err(e) = self.client.logout() {
                    error!("Client logout failed: {}", e);
                }
                self.client_code.clear();
                self.client_error = None;
                Task::none()
            }
            Message::ClientRefresh => {
                if let Err(e) = self.client.refresh() {
                    self.client_error = Some(e.to_string());
                }
                Task::none()
            }
            Message::Download(id) => self.start_download(id),
            Message::DownloadSaved(result) => {
                match result {
                    Ok(Some(path)) => info!("📥 Download saved to {}", path.display()),
                    Ok(None) => info!("Download cancelled"),
                    Err(e) => error!("Download error: {}", e),
                }
                Task::none()
            }
            Message::DownloadSettled(id) => {
                self.client.finish_download(&id);
                Task::none()
            }
        };

        if changes_gallery {
            self.sync_previews();
            self.sync_hidden_codes();
        }
        task
    }

    /// Store what the background encoder produced, in order
    fn finish_upload(&mut self, batch: EncodedBatch) {
        let Some(code) = self.uploading.take() else {
            return;
        };

        let report = self.admin.store_batch(&code, batch);
        match report.failure {
            Some(failure) => self.admin_error = Some(failure),
            None => {
                self.admin_notice = Some(report.success_message());
                self.selected_files.clear();
                self.upload_code.clear();
            }
        }
    }

    fn start_download(&mut self, id: String) -> Task<Message> {
        let Some(record) = self.client.images().iter().find(|r| r.id == id).cloned() else {
            return Task::none();
        };

        let settle = Task::perform(tokio::time::sleep(self.config.download_reset()), move |_| {
            Message::DownloadSettled(id.clone())
        });

        match self.client.begin_download(&record) {
            Ok(download) => Task::batch([
                Task::perform(save_download(download), Message::DownloadSaved),
                settle,
            ]),
            Err(e) => {
                error!("Download error: {}", e);
                settle
            }
        }
    }

    /// Keep one decoded image handle per record on screen
    fn sync_previews(&mut self) {
        let visible: Vec<&PhotoRecord> = self
            .admin
            .images()
            .iter()
            .chain(self.client.images().iter())
            .collect();
        let ids: HashSet<&str> = visible.iter().map(|record| record.id.as_str()).collect();

        self.previews.retain(|id, _| ids.contains(id.as_str()));

        for record in visible {
            if self.previews.contains_key(&record.id) {
                continue;
            }
            match encode::decode_data_url(&record.encoded_data) {
                Ok((_, bytes)) => {
                    self.previews
                        .insert(record.id.clone(), image::Handle::from_bytes(bytes));
                }
                Err(e) => warn!("Skipping preview for {}: {}", record.original_name, e),
            }
        }
    }

    /// Find galleries on disk that the admin overview cannot show
    fn sync_hidden_codes(&mut self) {
        if !self.admin.is_authenticated() {
            self.hidden_codes.clear();
            return;
        }

        match self.library.stored_codes() {
            Ok(codes) => {
                self.hidden_codes = codes
                    .into_iter()
                    .filter(|code| {
                        !self
                            .config
                            .aggregate_codes
                            .iter()
                            .any(|known| known.eq_ignore_ascii_case(code.as_str()))
                    })
                    .collect();
            }
            Err(e) => warn!("Could not list stored galleries: {}", e),
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        match self.screen {
            Screen::Home => ui::home::view(),
            Screen::Client => ui::client::view(self),
            Screen::Admin => ui::admin::view(self),
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Light
    }
}

/// Show the native multi-file picker, images only
async fn pick_files() -> Vec<PathBuf> {
    rfd::AsyncFileDialog::new()
        .set_title("Select Photos")
        .add_filter("Images", &encode::IMAGE_EXTENSIONS)
        .pick_files()
        .await
        .map(|handles| handles.iter().map(|h| h.path().to_path_buf()).collect())
        .unwrap_or_default()
}

/// Pick a folder and collect every image inside it
async fn pick_folder() -> Vec<PathBuf> {
    let Some(folder) = rfd::AsyncFileDialog::new()
        .set_title("Select Folder with Photos")
        .pick_folder()
        .await
    else {
        return Vec::new();
    };

    let folder = folder.path().to_path_buf();
    info!("🔍 Scanning folder: {}", folder.display());

    tokio::task::spawn_blocking(move || encode::scan_folder(&folder))
        .await
        .unwrap_or_default()
}

/// Blocking yes/no prompt before a photo is removed
async fn confirm_delete() -> bool {
    let result = rfd::AsyncMessageDialog::new()
        .set_level(rfd::MessageLevel::Warning)
        .set_title("Delete photo")
        .set_description("Are you sure you want to delete this photo?")
        .set_buttons(rfd::MessageButtons::YesNo)
        .show()
        .await;

    matches!(result, rfd::MessageDialogResult::Yes)
}

/// Ask where to save, suggesting the original filename, then write the bytes
async fn save_download(download: Download) -> Result<Option<PathBuf>, String> {
    let Some(handle) = rfd::AsyncFileDialog::new()
        .set_title("Save Photo")
        .set_file_name(download.file_name.clone())
        .save_file()
        .await
    else {
        return Ok(None);
    };

    let path = handle.path().to_path_buf();
    tokio::task::spawn_blocking(move || {
        download
            .save_to(&path)
            .map(|_| Some(path))
            .map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| format!("Task join error: {}", e))?
}

fn main() -> Result<(), GalleryError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("studio_gallery=info")),
        )
        .init();

    let config = StudioConfig::load()?;
    let library = Rc::new(Library::open(&config.db_path())?);

    iced::application("Studio Gallery", Studio::update, Studio::view)
        .theme(Studio::theme)
        .centered()
        .run_with(move || Studio::new(config, library))?;

    Ok(())
}
