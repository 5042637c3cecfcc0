use directories::ProjectDirs;
use nanoserde::{DeJson, SerJson};
use std::fs::{create_dir_all, read_to_string};
use std::path::{Path, PathBuf};
use std::{fs, io};

pub trait Storage {
    fn get_value<T: DeJson>(&self, file_name: impl AsRef<Path>) -> Option<T>;
    fn save_value<T: SerJson>(&self, file_name: impl AsRef<Path>, to_save: &T) -> io::Result<()>;
    /// Directory for files the user produces, like screenshots.
    fn data_dir(&self) -> PathBuf;
}

/// Keeps the settings in the platform's config directory.
pub struct FileStorage {
    project_dirs: ProjectDirs,
}

impl FileStorage {
    pub fn new() -> Option<FileStorage> {
        let project_dirs = ProjectDirs::from("", "Screenpad", "Screenpad")?;

        for dir in [project_dirs.config_dir(), project_dirs.data_dir()].iter() {
            if let Err(e) = create_dir_all(dir) {
                log::warn!("Could not create {:?}: {}", dir, e);
            }
        }

        Some(FileStorage { project_dirs })
    }
}

impl Storage for FileStorage {
    fn get_value<T: DeJson>(&self, file_name: impl AsRef<Path>) -> Option<T> {
        let path = self.project_dirs.config_dir().join(file_name);
        let json = read_to_string(&path).ok()?;

        match T::deserialize_json(json.as_str()) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Ignoring unreadable settings in {:?}: {:?}", path, e);
                None
            }
        }
    }

    fn save_value<T: SerJson>(&self, file_name: impl AsRef<Path>, to_save: &T) -> io::Result<()> {
        fs::write(self.project_dirs.config_dir().join(file_name), to_save.serialize_json())
    }

    fn data_dir(&self) -> PathBuf {
        self.project_dirs.data_dir().to_path_buf()
    }
}
