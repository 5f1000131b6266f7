use std::path::Path;

use planner_core::media;
use planner_core::storage::data_dir;
use planner_core::Config;

use super::common::{print_json, CliResult};

pub fn run() -> CliResult {
    let config = Config::load_from(&data_dir()?)?;
    let status = media::query(config.media.helper.as_deref().map(Path::new));
    print_json(&status)
}
