use file_system::get_database_path;

/// Returns the database URL in the format sqlite:///absolute/path/to/db.sqlite
pub fn get_database_url() -> Result<String, sqlx::Error> {
    if let Ok(env_url) = dotenvy::var("DATABASE_URL") {
        return Ok(env_url);
    }

    let db_path = get_database_path()?;

    Ok(format!("sqlite://{}", db_path.display()))
}
