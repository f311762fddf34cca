use serde::Deserialize;
use std::path::PathBuf;

/// Where the station logger lives and which zone its clock runs in.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StationSettings {
    /// DBF table the logger appends to.
    pub dbf_path: PathBuf,
    /// IANA zone of the `DAT`/`CAS` columns.
    pub timezone: String,
    /// Logger executable. Its file name identifies the process.
    pub executable: PathBuf,
}

impl Default for StationSettings {
    fn default() -> Self {
        Self {
            dbf_path: PathBuf::from("C:/WinMeteo/Data/meteo.DBF"),
            timezone: "Europe/Prague".into(),
            executable: PathBuf::from("C:/WinMeteo/WinMeteo.exe"),
        }
    }
}
