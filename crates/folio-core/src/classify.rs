// User-agent classification
//
// Each classifier is an ordered rule table evaluated top to bottom; the first
// rule whose pattern occurs in the user agent wins. Order matters: an Edge
// user agent also carries a "Chrome" token and is reported as Chrome.

use crate::event::{Browser, DeviceType, Os};

/// Labels derived from a single user-agent string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserAgentInfo {
    pub device_type: DeviceType,
    pub browser: Browser,
    pub os: Os,
}

/// Device rules, matched case-insensitively (patterns are lowercase).
/// Tablet comes first: an iPad matches both lists.
const DEVICE_RULES: &[(&str, DeviceType)] = &[
    ("tablet", DeviceType::Tablet),
    ("ipad", DeviceType::Tablet),
    ("mobile", DeviceType::Mobile),
    ("android", DeviceType::Mobile),
    ("iphone", DeviceType::Mobile),
    ("ipad", DeviceType::Mobile),
];

/// Browser rules, matched case-sensitively.
const BROWSER_RULES: &[(&str, Browser)] = &[
    ("Chrome", Browser::Chrome),
    ("Firefox", Browser::Firefox),
    ("Safari", Browser::Safari),
    ("Edge", Browser::Edge),
];

/// OS rules, matched case-sensitively.
const OS_RULES: &[(&str, Os)] = &[
    ("Windows", Os::Windows),
    ("Mac", Os::MacOs),
    ("Linux", Os::Linux),
    ("Android", Os::Android),
    ("iOS", Os::Ios),
    ("iPhone", Os::Ios),
];

fn first_match<L: Copy>(haystack: &str, rules: &[(&str, L)], fallback: L) -> L {
    rules
        .iter()
        .find(|(pattern, _)| haystack.contains(pattern))
        .map(|(_, label)| *label)
        .unwrap_or(fallback)
}

pub fn classify_device(user_agent: &str) -> DeviceType {
    first_match(
        &user_agent.to_lowercase(),
        DEVICE_RULES,
        DeviceType::Desktop,
    )
}

pub fn classify_browser(user_agent: &str) -> Browser {
    first_match(user_agent, BROWSER_RULES, Browser::Unknown)
}

pub fn classify_os(user_agent: &str) -> Os {
    first_match(user_agent, OS_RULES, Os::Unknown)
}

/// Classify a user agent into device, browser and OS labels.
/// An empty string yields `desktop` / `unknown` / `unknown`.
pub fn classify_user_agent(user_agent: &str) -> UserAgentInfo {
    UserAgentInfo {
        device_type: classify_device(user_agent),
        browser: classify_browser(user_agent),
        os: classify_os(user_agent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IPAD_SAFARI: &str = "Mozilla/5.0 (iPad; CPU OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
    const IPHONE_SAFARI: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
    const ANDROID_CHROME: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36";
    const WINDOWS_EDGE: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edge/120.0.0.0";
    const WINDOWS_FIREFOX: &str =
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0";
    const MAC_SAFARI: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_0) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Safari/605.1.15";
    const LINUX_FIREFOX: &str =
        "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0";

    #[test]
    fn test_ipad_is_tablet_not_mobile() {
        assert_eq!(classify_device(IPAD_SAFARI), DeviceType::Tablet);
    }

    #[test]
    fn test_device_match_is_case_insensitive() {
        assert_eq!(classify_device("SOMETHING TABLET"), DeviceType::Tablet);
        assert_eq!(classify_device("x IPHONE y"), DeviceType::Mobile);
    }

    #[test]
    fn test_mobile_devices() {
        assert_eq!(classify_device(IPHONE_SAFARI), DeviceType::Mobile);
        assert_eq!(classify_device(ANDROID_CHROME), DeviceType::Mobile);
    }

    #[test]
    fn test_desktop_fallback() {
        assert_eq!(classify_device(WINDOWS_FIREFOX), DeviceType::Desktop);
        assert_eq!(classify_device(""), DeviceType::Desktop);
    }

    #[test]
    fn test_edge_reported_as_chrome() {
        assert_eq!(classify_browser(WINDOWS_EDGE), Browser::Chrome);
    }

    #[test]
    fn test_browser_priority() {
        assert_eq!(classify_browser(ANDROID_CHROME), Browser::Chrome);
        assert_eq!(classify_browser(WINDOWS_FIREFOX), Browser::Firefox);
        assert_eq!(classify_browser(MAC_SAFARI), Browser::Safari);
        assert_eq!(classify_browser("Mozilla/5.0 Edge/18.0"), Browser::Edge);
        assert_eq!(classify_browser("curl/8.4.0"), Browser::Unknown);
    }

    #[test]
    fn test_browser_match_is_case_sensitive() {
        assert_eq!(classify_browser("chrome"), Browser::Unknown);
    }

    #[test]
    fn test_os_priority() {
        assert_eq!(classify_os(WINDOWS_FIREFOX), Os::Windows);
        assert_eq!(classify_os(MAC_SAFARI), Os::MacOs);
        assert_eq!(classify_os(LINUX_FIREFOX), Os::Linux);
        // Android user agents carry "Linux" first in the rule order
        assert_eq!(classify_os(ANDROID_CHROME), Os::Linux);
        // iPhone user agents carry "Mac OS X"
        assert_eq!(classify_os(IPHONE_SAFARI), Os::MacOs);
        assert_eq!(classify_os("Dalvik/2.1.0 Android"), Os::Android);
        assert_eq!(classify_os("MyApp/1.0 iOS 17"), Os::Ios);
        assert_eq!(classify_os("MyApp/1.0 (iPhone)"), Os::Ios);
        assert_eq!(classify_os(""), Os::Unknown);
    }

    #[test]
    fn test_classify_empty_user_agent() {
        assert_eq!(
            classify_user_agent(""),
            UserAgentInfo {
                device_type: DeviceType::Desktop,
                browser: Browser::Unknown,
                os: Os::Unknown,
            }
        );
    }

    #[test]
    fn test_classify_full_user_agent() {
        let info = classify_user_agent(IPAD_SAFARI);
        assert_eq!(info.device_type, DeviceType::Tablet);
        assert_eq!(info.browser, Browser::Safari);
        assert_eq!(info.os, Os::MacOs);
    }
}
