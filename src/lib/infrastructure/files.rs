//! Flat-file adapters: allow-list, activity log and templates

use std::path::PathBuf;

use clap::Parser;

mod activity_log;
mod allow_list;
mod templates;

pub use activity_log::FileActivityLog;
pub use allow_list::FileAllowList;
pub use templates::FileTemplateStore;

/// Locations of the files the service reads and writes
#[derive(Clone, Debug, PartialEq, Eq, Parser)]
pub struct FilesConfig {
    /// File with one permitted caller address per line
    #[arg(long, env = "ALLOW_LIST_FILE", default_value = "whitelist.txt")]
    pub allow_list_file: PathBuf,

    /// Directory holding the mail templates
    #[arg(long, env = "TEMPLATE_DIR", default_value = "templates")]
    pub template_dir: PathBuf,

    /// Activity log file, appended to
    #[arg(long, env = "LOG_FILE", default_value = "mail.log")]
    pub log_file: PathBuf,
}
