use std::{fs, io, path::PathBuf};

use directories_next::ProjectDirs;

/// Returns path to database file located in default data dir for application.
pub fn get_database_path() -> io::Result<PathBuf> {
    Ok(get_default_data_dir()?.join("db.sqlite"))
}

/// Returns root of the local staging trees (`temp/{videos|audio|clips|thumbnails}`).
pub fn get_temp_root_dir() -> io::Result<PathBuf> {
    Ok(get_default_data_dir()?.join("temp"))
}

/// Returns directory for rotated log files.
pub fn get_log_dir() -> io::Result<PathBuf> {
    Ok(get_default_data_dir()?.join("logs"))
}

fn get_default_data_dir() -> io::Result<PathBuf> {
    let project_dirs = ProjectDirs::from("org", "clipvault", "clipvault")
        .ok_or_else(|| io::Error::other("could not determine project directory"))?;
    let data_dir = project_dirs.data_local_dir();
    fs::create_dir_all(data_dir)?;
    Ok(PathBuf::from(data_dir))
}
