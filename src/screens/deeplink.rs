//! # Deep Links
//!
//! The application's deep link model and its textual form.
//!
//! ```text
//! [navstack://]archive/category/<category>   ArchiveTab(OpenCategory)
//! [navstack://]archive/search                ArchiveTab(OpenSearch)
//! [navstack://]device/update                 DeviceTab(OpenUpdate)
//! [navstack://]device/web-update/<url>       DeviceTab(WebUpdate)   url may contain '/'
//! [navstack://]hub                           HubTab(Main)
//! [navstack://]hub/faphub                    HubTab(FapHub(Main))
//! [navstack://]hub/faphub/category/<name>    HubTab(FapHub(Category))
//! [navstack://]hub/faphub/app/<id>           HubTab(FapHub(App))
//! [navstack://]tab/<archive|device|hub>      OpenTab
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::router::TabKey;

pub const SCHEME: &str = "navstack://";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tab {
    Archive,
    #[default]
    Device,
    Hub,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Archive, Tab::Device, Tab::Hub];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Archive => "Archive",
            Tab::Device => "Device",
            Tab::Hub => "Hub",
        }
    }
}

impl TabKey for Tab {
    fn id(self) -> &'static str {
        match self {
            Tab::Archive => "archive",
            Tab::Device => "device",
            Tab::Hub => "hub",
        }
    }

    fn from_id(id: &str) -> Option<Self> {
        Tab::ALL.into_iter().find(|tab| tab.id() == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryType {
    SubGhz,
    Rfid,
    Nfc,
    Infrared,
    IButton,
    BadUsb,
}

impl CategoryType {
    pub const ALL: [CategoryType; 6] = [
        CategoryType::SubGhz,
        CategoryType::Rfid,
        CategoryType::Nfc,
        CategoryType::Infrared,
        CategoryType::IButton,
        CategoryType::BadUsb,
    ];

    pub fn id(self) -> &'static str {
        match self {
            CategoryType::SubGhz => "subghz",
            CategoryType::Rfid => "rfid",
            CategoryType::Nfc => "nfc",
            CategoryType::Infrared => "infrared",
            CategoryType::IButton => "ibutton",
            CategoryType::BadUsb => "badusb",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebUpdate {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArchiveLink {
    OpenCategory(CategoryType),
    OpenSearch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceLink {
    OpenUpdate,
    WebUpdate(WebUpdate),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FapHubLink {
    Main,
    Category(String),
    App(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HubLink {
    Main,
    FapHub(FapHubLink),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeepLink {
    ArchiveTab(ArchiveLink),
    DeviceTab(DeviceLink),
    HubTab(HubLink),
    OpenTab(Tab),
}

impl DeepLink {
    pub fn tab(&self) -> Tab {
        match self {
            DeepLink::ArchiveTab(_) => Tab::Archive,
            DeepLink::DeviceTab(_) => Tab::Device,
            DeepLink::HubTab(_) => Tab::Hub,
            DeepLink::OpenTab(tab) => *tab,
        }
    }
}

// ============================================================================
// Parsing
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeepLinkParseError {
    Empty,
    UnknownPath(String),
    UnknownCategory(String),
    UnknownTab(String),
    MissingUrl,
}

impl fmt::Display for DeepLinkParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeepLinkParseError::Empty => write!(f, "empty deep link"),
            DeepLinkParseError::UnknownPath(path) => write!(f, "unknown deep link path: {path}"),
            DeepLinkParseError::UnknownCategory(c) => write!(f, "unknown archive category: {c}"),
            DeepLinkParseError::UnknownTab(t) => write!(f, "unknown tab: {t}"),
            DeepLinkParseError::MissingUrl => write!(f, "web update link without url"),
        }
    }
}

impl std::error::Error for DeepLinkParseError {}

impl FromStr for DeepLink {
    type Err = DeepLinkParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let path = trimmed.strip_prefix(SCHEME).unwrap_or(trimmed);
        let path = path.trim_start_matches('/');

        // Everything after the prefix is the url, slashes included.
        if let Some(rest) = path.strip_prefix("device/web-update") {
            if rest.is_empty() || rest.starts_with('/') {
                let url = rest.trim_start_matches('/');
                if url.is_empty() {
                    return Err(DeepLinkParseError::MissingUrl);
                }
                return Ok(DeepLink::DeviceTab(DeviceLink::WebUpdate(WebUpdate {
                    url: url.to_string(),
                })));
            }
        }

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let link = match segments.as_slice() {
            [] => return Err(DeepLinkParseError::Empty),
            ["archive", "category", category] => {
                let category = CategoryType::from_id(category)
                    .ok_or_else(|| DeepLinkParseError::UnknownCategory(category.to_string()))?;
                DeepLink::ArchiveTab(ArchiveLink::OpenCategory(category))
            }
            ["archive", "search"] => DeepLink::ArchiveTab(ArchiveLink::OpenSearch),
            ["device", "update"] => DeepLink::DeviceTab(DeviceLink::OpenUpdate),
            ["hub"] => DeepLink::HubTab(HubLink::Main),
            ["hub", "faphub"] => DeepLink::HubTab(HubLink::FapHub(FapHubLink::Main)),
            ["hub", "faphub", "category", name] => {
                DeepLink::HubTab(HubLink::FapHub(FapHubLink::Category(name.to_string())))
            }
            ["hub", "faphub", "app", id] => {
                DeepLink::HubTab(HubLink::FapHub(FapHubLink::App(id.to_string())))
            }
            ["tab", tab] => DeepLink::OpenTab(
                Tab::from_id(tab).ok_or_else(|| DeepLinkParseError::UnknownTab(tab.to_string()))?,
            ),
            _ => return Err(DeepLinkParseError::UnknownPath(path.to_string())),
        };
        Ok(link)
    }
}

impl fmt::Display for DeepLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeepLink::ArchiveTab(ArchiveLink::OpenCategory(c)) => {
                write!(f, "archive/category/{}", c.id())
            }
            DeepLink::ArchiveTab(ArchiveLink::OpenSearch) => write!(f, "archive/search"),
            DeepLink::DeviceTab(DeviceLink::OpenUpdate) => write!(f, "device/update"),
            DeepLink::DeviceTab(DeviceLink::WebUpdate(update)) => {
                write!(f, "device/web-update/{}", update.url)
            }
            DeepLink::HubTab(HubLink::Main) => write!(f, "hub"),
            DeepLink::HubTab(HubLink::FapHub(FapHubLink::Main)) => write!(f, "hub/faphub"),
            DeepLink::HubTab(HubLink::FapHub(FapHubLink::Category(name))) => {
                write!(f, "hub/faphub/category/{name}")
            }
            DeepLink::HubTab(HubLink::FapHub(FapHubLink::App(id))) => {
                write!(f, "hub/faphub/app/{id}")
            }
            DeepLink::OpenTab(tab) => write!(f, "tab/{}", tab.id()),
        }
    }
}
