use std::fs::File;
use std::sync::Arc;

use clap::Parser;
use log::{info, warn};
use simplelog::{ConfigBuilder, WriteLogger};

use navstack::core::config::{self, NavstackConfig};
use navstack::core::settings::{FileSettingsStore, MemorySettingsStore, SettingsStore};
use navstack::router::{NodeContext, TabKey};
use navstack::screens::{BottomBar, DeepLink, Tab};
use navstack::tui;

#[derive(Parser)]
#[command(name = "navstack", about = "Tabbed, nested navigation in the terminal")]
struct Args {
    /// Tab to open on (archive, device, hub); overrides the persisted tab
    #[arg(short, long)]
    tab: Option<String>,

    /// Deep link to open, e.g. hub/faphub/app/snake; wins over --tab
    #[arg(short, long)]
    deeplink: Option<DeepLink>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let (config, config_error) = match config::load_config() {
        Ok(config) => (config, None),
        Err(e) => (NavstackConfig::default(), Some(e)),
    };
    let resolved = config::resolve(&config, args.tab.as_deref());

    // Initialize file logger - writes to navstack.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("navstack.log") {
        let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
    }

    if let Some(e) = config_error {
        warn!("Ignoring config file: {}", e);
    }
    info!("Navstack starting up with {:?}", resolved);

    let store: Arc<dyn SettingsStore> = match &resolved.settings_path {
        Some(path) => match FileSettingsStore::open(path) {
            Ok(store) => Arc::new(store),
            Err(e) => {
                warn!("Settings at {} unusable ({}), not persisting", path.display(), e);
                Arc::new(MemorySettingsStore::new())
            }
        },
        None => Arc::new(MemorySettingsStore::new()),
    };

    let default_tab = Tab::from_id(&resolved.default_tab).unwrap_or_else(|| {
        warn!("Unknown default tab {:?}", resolved.default_tab);
        Tab::default()
    });
    let requested_tab = args.tab.as_deref().and_then(Tab::from_id);
    let link = args.deeplink.or(requested_tab.map(DeepLink::OpenTab));

    let node = NodeContext::root("bottombar");
    let registry = node.back.clone();
    let mut root = BottomBar::new(node, link, store, default_tab);

    let result = tui::run(&mut root, registry);

    // Let the last selected-tab write land before the runtime shuts down.
    root.settle().await;
    info!("Navstack shutting down");
    result
}
