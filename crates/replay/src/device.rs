use viewlog_core::Device;
use woothee::parser::Parser;

/// Maps user-agent strings to a coarse device category. Same input always
/// yields the same category; a missing user-agent is `Unknown`.
pub struct DeviceResolver {
    parser: Parser,
}

impl DeviceResolver {
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
        }
    }

    pub fn resolve(&self, user_agent: Option<&str>) -> Device {
        let Some(ua) = user_agent else {
            return Device::Unknown;
        };
        let Some(result) = self.parser.parse(ua) else {
            return Device::Unknown;
        };
        match result.category {
            "pc" => Device::Pc,
            "smartphone" | "mobilephone" => Device::Mobile,
            "tablet" => Device::Tablet,
            "crawler" => Device::Crawler,
            _ => Device::Unknown,
        }
    }
}

impl Default for DeviceResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHROME_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
    const IPHONE_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 13_5 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/13.1.1 Mobile/15E148 Safari/604.1";
    const GOOGLEBOT_UA: &str = "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";

    #[test]
    fn missing_user_agent_is_unknown() {
        let resolver = DeviceResolver::new();
        assert_eq!(resolver.resolve(None), Device::Unknown);
    }

    #[test]
    fn desktop_browser_is_pc() {
        let resolver = DeviceResolver::new();
        assert_eq!(resolver.resolve(Some(CHROME_UA)), Device::Pc);
    }

    #[test]
    fn iphone_is_mobile() {
        let resolver = DeviceResolver::new();
        assert_eq!(resolver.resolve(Some(IPHONE_UA)), Device::Mobile);
    }

    #[test]
    fn googlebot_is_crawler() {
        let resolver = DeviceResolver::new();
        assert_eq!(resolver.resolve(Some(GOOGLEBOT_UA)), Device::Crawler);
    }

    #[test]
    fn resolution_is_deterministic() {
        let resolver = DeviceResolver::new();
        assert_eq!(
            resolver.resolve(Some(CHROME_UA)),
            resolver.resolve(Some(CHROME_UA))
        );
        assert_eq!(resolver.resolve(Some("garbage")), resolver.resolve(Some("garbage")));
    }
}
