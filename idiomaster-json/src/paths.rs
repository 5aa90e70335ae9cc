use directories::ProjectDirs;
use std::path::PathBuf;

pub fn data_root() -> PathBuf {
    // org = "idiomaster", app = "Idiomaster"
    if let Some(pd) = ProjectDirs::from("com", "idiomaster", "Idiomaster") {
        pd.data_dir().to_path_buf()
    } else {
        // Fallback: current dir
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    }
}

pub fn default_prefs_file() -> PathBuf {
    data_root().join("prefs.json")
}
