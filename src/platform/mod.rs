//! Platform detection for the install hint
//!
//! Classifies the browser from a handful of environment signals and maps
//! each platform to the instructions for adding the app to a home screen or
//! dock. Everything here is pure so it can be tested without a browser.

pub mod hint;

pub use hint::HintState;

/// What the page can observe about its environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSignals {
    /// `navigator.userAgent`
    pub user_agent: String,
    /// `navigator.platform` (iPadOS reports "MacIntel")
    pub navigator_platform: String,
    /// `navigator.maxTouchPoints`
    pub max_touch_points: u32,
    /// Running as an installed app (`display-mode: standalone`)
    pub standalone: bool,
}

impl EnvSignals {
    pub fn from_user_agent(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            ..Self::default()
        }
    }

    /// Read the signals from the current page
    #[cfg(target_arch = "wasm32")]
    pub fn detect() -> Self {
        let Some(window) = web_sys::window() else {
            return Self::default();
        };
        let navigator = window.navigator();
        let display_standalone = window
            .match_media("(display-mode: standalone)")
            .ok()
            .flatten()
            .map(|m| m.matches())
            .unwrap_or(false);
        // iOS home screen apps expose the non-standard `navigator.standalone`
        let ios_standalone =
            js_sys::Reflect::get(&navigator, &wasm_bindgen::JsValue::from_str("standalone"))
                .ok()
                .and_then(|v| v.as_bool())
                .unwrap_or(false);

        Self {
            user_agent: navigator.user_agent().unwrap_or_default(),
            navigator_platform: navigator.platform().unwrap_or_default(),
            max_touch_points: navigator.max_touch_points().max(0) as u32,
            standalone: display_standalone || ios_standalone,
        }
    }
}

/// Install flavour of the current browser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    IosSafari,
    IpadOs,
    MacSafari,
    AndroidChrome,
    AndroidFirefox,
    DesktopChromium,
    DesktopFirefox,
    Other,
    /// Already running as an installed app
    AlreadyInstalled,
}

impl Platform {
    pub const ALL: [Platform; 9] = [
        Platform::IosSafari,
        Platform::IpadOs,
        Platform::MacSafari,
        Platform::AndroidChrome,
        Platform::AndroidFirefox,
        Platform::DesktopChromium,
        Platform::DesktopFirefox,
        Platform::Other,
        Platform::AlreadyInstalled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::IosSafari => "ios-safari",
            Platform::IpadOs => "ipados",
            Platform::MacSafari => "mac-safari",
            Platform::AndroidChrome => "android-chrome",
            Platform::AndroidFirefox => "android-firefox",
            Platform::DesktopChromium => "desktop-chromium",
            Platform::DesktopFirefox => "desktop-firefox",
            Platform::Other => "other",
            Platform::AlreadyInstalled => "already-installed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == s)
    }

    /// Instructions for installing the app, `None` once installed
    pub fn install_hint(&self) -> Option<&'static str> {
        let message = match self {
            Platform::IosSafari => "On iPhone, tap Share (↑) → “Add to Home Screen”.",
            Platform::IpadOs => "On iPad, tap Share → “Add to Home Screen”.",
            Platform::MacSafari => "On macOS Safari, go to File → “Add to Dock…”",
            Platform::AndroidChrome => "In Chrome on Android, tap ⋮ → “Install App”.",
            Platform::AndroidFirefox => "In Firefox on Android, tap ⋮ → “Add to Home screen”.",
            Platform::DesktopChromium => {
                "Click the install icon in the address bar, or open the browser menu → “Install Daily Habits…”"
            }
            Platform::DesktopFirefox => {
                "Firefox does not support installation. Try Chrome or Safari."
            }
            Platform::Other => "Look for the install option in your browser address bar or menu.",
            Platform::AlreadyInstalled => return None,
        };
        Some(message)
    }
}

/// Classify the environment. First matching rule wins.
pub fn classify(env: &EnvSignals) -> Platform {
    if env.standalone {
        return Platform::AlreadyInstalled;
    }

    let ua = env.user_agent.to_lowercase();
    let has = |needle: &str| ua.contains(needle);

    if has("iphone") || has("ipod") {
        return Platform::IosSafari;
    }
    // iPadOS 13+ masquerades as desktop Safari; touch support gives it away
    if has("ipad") || (env.navigator_platform == "MacIntel" && env.max_touch_points > 1) {
        return Platform::IpadOs;
    }

    let firefox = has("firefox") || has("fxios");
    let chromium = has("chrome") || has("crios") || has("chromium") || has("edg");

    if has("android") {
        return if firefox {
            Platform::AndroidFirefox
        } else if chromium {
            Platform::AndroidChrome
        } else {
            Platform::Other
        };
    }
    if firefox {
        return Platform::DesktopFirefox;
    }
    if chromium {
        return Platform::DesktopChromium;
    }
    if has("macintosh") && has("safari") {
        return Platform::MacSafari;
    }
    Platform::Other
}

#[cfg(test)]
mod tests {
    use super::*;

    const IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1";
    const IPAD_LEGACY: &str = "Mozilla/5.0 (iPad; CPU OS 12_2 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/12.1 Mobile/15E148 Safari/604.1";
    const MAC_SAFARI: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15";
    const MAC_CHROME: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36";
    const ANDROID_CHROME: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.6312.99 Mobile Safari/537.36";
    const ANDROID_FIREFOX: &str = "Mozilla/5.0 (Android 14; Mobile; rv:124.0) Gecko/124.0 Firefox/124.0";
    const ANDROID_STOCK: &str = "Mozilla/5.0 (Linux; U; Android 4.4; en-us; Nexus 5 Build/KRT16M) AppleWebKit/534.30 (KHTML, like Gecko) Version/4.0 Mobile Safari/534.30";
    const WINDOWS_EDGE: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36 Edg/123.0.2420.81";
    const LINUX_FIREFOX: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:124.0) Gecko/20100101 Firefox/124.0";

    fn ua(s: &str) -> Platform {
        classify(&EnvSignals::from_user_agent(s))
    }

    #[test]
    fn test_mobile_platforms() {
        assert_eq!(ua(IPHONE), Platform::IosSafari);
        assert_eq!(ua(IPAD_LEGACY), Platform::IpadOs);
        assert_eq!(ua(ANDROID_CHROME), Platform::AndroidChrome);
        assert_eq!(ua(ANDROID_FIREFOX), Platform::AndroidFirefox);
        assert_eq!(ua(ANDROID_STOCK), Platform::Other);
    }

    #[test]
    fn test_desktop_platforms() {
        assert_eq!(ua(MAC_SAFARI), Platform::MacSafari);
        assert_eq!(ua(MAC_CHROME), Platform::DesktopChromium);
        assert_eq!(ua(WINDOWS_EDGE), Platform::DesktopChromium);
        assert_eq!(ua(LINUX_FIREFOX), Platform::DesktopFirefox);
        assert_eq!(ua(""), Platform::Other);
        assert_eq!(ua("curl/8.4.0"), Platform::Other);
    }

    #[test]
    fn test_ipados_desktop_mode_uses_touch_points() {
        let mut env = EnvSignals {
            user_agent: MAC_SAFARI.to_string(),
            navigator_platform: "MacIntel".to_string(),
            max_touch_points: 5,
            standalone: false,
        };
        assert_eq!(classify(&env), Platform::IpadOs);

        // A real Mac has no touch screen
        env.max_touch_points = 0;
        assert_eq!(classify(&env), Platform::MacSafari);
    }

    #[test]
    fn test_standalone_wins() {
        let env = EnvSignals {
            user_agent: IPHONE.to_string(),
            standalone: true,
            ..EnvSignals::default()
        };
        assert_eq!(classify(&env), Platform::AlreadyInstalled);
        assert_eq!(Platform::AlreadyInstalled.install_hint(), None);
    }

    #[test]
    fn test_every_other_platform_has_a_hint() {
        for p in Platform::ALL {
            if p != Platform::AlreadyInstalled {
                assert!(p.install_hint().is_some(), "{}", p.as_str());
            }
        }
    }

    #[test]
    fn test_slugs_round_trip() {
        for p in Platform::ALL {
            assert_eq!(Platform::from_str(p.as_str()), Some(p));
        }
        assert_eq!(Platform::from_str("windows-phone"), None);
    }
}
