/**
 * File Store
 *
 * File list, per-user and global dashboards, and the state of an upload in
 * progress. Upload progress is simulated: the API reports nothing until the
 * request completes, so the store ticks the indicator forward on a timer and
 * snaps it to 100 once the upload succeeds.
 */

use std::time::Duration;

use tokio::sync::watch;

use crate::client::services::FileService;
use crate::client::stores::{Reducer, StateCell};
use crate::client::transfer::{DownloadedFile, UploadFile};
use crate::shared::models::{Dashboard, FileRecord, GlobalDashboard};

/// Interval between simulated progress steps
pub const PROGRESS_TICK: Duration = Duration::from_millis(200);

/// Percentage added per tick
pub const PROGRESS_STEP: u8 = 5;

/// Highest simulated value while the upload is in flight
pub const PROGRESS_CAP: u8 = 95;

const LOAD_FILES_FAILED: &str = "Failed to load files";
const LOAD_DASHBOARD_FAILED: &str = "Failed to load dashboard";
const UPLOAD_FAILED: &str = "Failed to upload file";
const DELETE_FAILED: &str = "Failed to delete file";
const DOWNLOAD_FAILED: &str = "Failed to download file";

/// File state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileState {
    pub files: Vec<FileRecord>,
    pub dashboard: Option<Dashboard>,
    pub global_dashboard: Option<GlobalDashboard>,
    pub loading: bool,
    pub error: Option<String>,
    /// Percentage of the current upload, `None` when no upload is shown
    pub upload_progress: Option<u8>,
}

/// File transitions
#[derive(Debug, Clone, PartialEq)]
pub enum FileAction {
    Started,
    FilesLoaded(Vec<FileRecord>),
    DashboardLoaded(Dashboard),
    GlobalDashboardLoaded(GlobalDashboard),
    UploadStarted,
    UploadProgress(u8),
    Uploaded,
    Removed(i64),
    Finished,
    Failed(String),
    /// Error that does not end a loading phase (downloads)
    Error(String),
    ClearError,
}

impl Reducer for FileState {
    type Action = FileAction;

    fn reduce(self, action: FileAction) -> Self {
        match action {
            FileAction::Started => Self {
                loading: true,
                error: None,
                ..self
            },
            FileAction::FilesLoaded(files) => Self {
                files,
                loading: false,
                ..self
            },
            FileAction::DashboardLoaded(dashboard) => Self {
                dashboard: Some(dashboard),
                loading: false,
                ..self
            },
            FileAction::GlobalDashboardLoaded(dashboard) => Self {
                global_dashboard: Some(dashboard),
                loading: false,
                ..self
            },
            FileAction::UploadStarted => Self {
                loading: true,
                error: None,
                upload_progress: Some(0),
                ..self
            },
            FileAction::UploadProgress(percent) => Self {
                upload_progress: Some(percent.min(100)),
                ..self
            },
            FileAction::Uploaded => Self {
                upload_progress: Some(100),
                ..self
            },
            FileAction::Removed(id) => {
                let files = self.files.into_iter().filter(|f| f.id != id).collect();
                Self {
                    files,
                    loading: false,
                    ..self
                }
            }
            FileAction::Finished => Self {
                loading: false,
                ..self
            },
            FileAction::Failed(message) => Self {
                loading: false,
                error: Some(message),
                upload_progress: None,
                ..self
            },
            FileAction::Error(message) => Self {
                error: Some(message),
                ..self
            },
            FileAction::ClearError => Self {
                error: None,
                ..self
            },
        }
    }
}

/// File store
#[derive(Debug)]
pub struct FileStore {
    service: FileService,
    state: StateCell<FileState>,
}

impl FileStore {
    pub fn new(service: FileService) -> Self {
        Self {
            service,
            state: StateCell::new(),
        }
    }

    pub fn snapshot(&self) -> FileState {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<FileState> {
        self.state.subscribe()
    }

    pub async fn load_files(&self) {
        self.state.apply(FileAction::Started);
        match self.service.list().await {
            Ok(files) => self.state.apply(FileAction::FilesLoaded(files)),
            Err(e) => {
                tracing::warn!("[FileStore] Loading files failed: {}", e);
                self.state
                    .apply(FileAction::Failed(e.user_message(LOAD_FILES_FAILED)));
            }
        }
    }

    pub async fn load_dashboard(&self) {
        self.state.apply(FileAction::Started);
        match self.service.dashboard().await {
            Ok(dashboard) => self.state.apply(FileAction::DashboardLoaded(dashboard)),
            Err(e) => {
                tracing::warn!("[FileStore] Loading dashboard failed: {}", e);
                self.state
                    .apply(FileAction::Failed(e.user_message(LOAD_DASHBOARD_FAILED)));
            }
        }
    }

    pub async fn load_global_dashboard(&self) {
        self.state.apply(FileAction::Started);
        match self.service.global_dashboard().await {
            Ok(dashboard) => self
                .state
                .apply(FileAction::GlobalDashboardLoaded(dashboard)),
            Err(e) => {
                tracing::warn!("[FileStore] Loading global dashboard failed: {}", e);
                self.state
                    .apply(FileAction::Failed(e.user_message(LOAD_DASHBOARD_FAILED)));
            }
        }
    }

    /// Upload a file, then reload the list and the dashboard
    ///
    /// Returns whether the upload itself succeeded.
    pub async fn upload_file(&self, file: UploadFile) -> bool {
        self.state.apply(FileAction::UploadStarted);

        let upload = self.service.upload(file);
        tokio::pin!(upload);
        let mut ticker = tokio::time::interval(PROGRESS_TICK);
        // the first tick completes immediately
        ticker.tick().await;

        let mut progress = 0u8;
        let result = loop {
            tokio::select! {
                result = &mut upload => break result,
                _ = ticker.tick() => {
                    if progress < PROGRESS_CAP {
                        progress = (progress + PROGRESS_STEP).min(PROGRESS_CAP);
                        self.state.apply(FileAction::UploadProgress(progress));
                    }
                }
            }
        };

        match result {
            Ok(record) => {
                tracing::info!("[FileStore] Uploaded {} (id {})", record.filename, record.id);
                self.state.apply(FileAction::Uploaded);
                self.load_files().await;
                self.load_dashboard().await;
                self.state.apply(FileAction::Finished);
                true
            }
            Err(e) => {
                tracing::warn!("[FileStore] Upload failed: {}", e);
                self.state.apply(FileAction::Failed(e.user_message(UPLOAD_FAILED)));
                false
            }
        }
    }

    /// Delete a file, drop it from the list, then reload the dashboard
    pub async fn delete_file(&self, id: i64) {
        self.state.apply(FileAction::Started);
        match self.service.delete(id).await {
            Ok(()) => {
                self.state.apply(FileAction::Removed(id));
                self.load_dashboard().await;
            }
            Err(e) => {
                tracing::warn!("[FileStore] Deleting file {} failed: {}", id, e);
                self.state.apply(FileAction::Failed(e.user_message(DELETE_FAILED)));
            }
        }
    }

    /// Fetch a file's contents
    pub async fn download_file(&self, id: i64) -> Option<DownloadedFile> {
        match self.service.download(id).await {
            Ok(file) => Some(file),
            Err(e) => {
                tracing::warn!("[FileStore] Downloading file {} failed: {}", id, e);
                self.state.apply(FileAction::Error(e.user_message(DOWNLOAD_FAILED)));
                None
            }
        }
    }

    pub fn clear_errors(&self) {
        self.state.apply(FileAction::ClearError);
    }
}
