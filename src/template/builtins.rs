//! Built-in query shortcuts
//!
//! The default template set compiled into the binary. User templates loaded
//! from the config file come after these, so a user line can add a new
//! name+arity combination; redefining an existing one is reported as
//! ambiguous at resolution time.

/// Default shortcut lines, in the `name[,CODE=value]*,pattern` grammar
pub static DEFAULT_TEMPLATES: &[&str] = &[
    "go,https://cht.sh/go/<entry>",
    "rust,https://cht.sh/rust/<entry>",
    "news,M=30,http://getnews.tech",
    "ip,F=1,https://ifconfig.me",
    "city,ifconfig.co/city",
    "weather,M=120,wttr.in/",
    "weather,M=120,wttr.in/<city>",
    "eth,M=60,rate.sx/ETH",
    "btc,M=60,rate.sx/BTC",
    "whois,F=1,ipinfo.io/<what>",
    "qrcode,M=99999,qrenco.de/<item>",
];
