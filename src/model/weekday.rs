// Weekday abbreviation tables used to validate and match schedule days.
use anyhow::{Result, anyhow};
use chrono::{DateTime, Datelike, Duration, Local, Locale, Utc, Weekday};

/// Monday-first, the order `DayNames` stores its abbreviations in.
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

const POSIX_ABBREVIATIONS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Special `day_locale` value that asks for the host locale.
pub const SYSTEM_LOCALE: &str = "system";

/// The seven day tokens a schedule may use.
///
/// Tokens are matched exactly (case-sensitive), the same way `%a` prints them
/// for the selected locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayNames {
    abbreviations: [String; 7],
}

impl Default for DayNames {
    fn default() -> Self {
        Self::posix()
    }
}

impl DayNames {
    /// English abbreviations: `Mon Tue Wed Thu Fri Sat Sun`.
    pub fn posix() -> Self {
        Self {
            abbreviations: POSIX_ABBREVIATIONS.map(str::to_string),
        }
    }

    /// Abbreviations of a named locale. Accepts `de_DE`, `de-DE` and `de_DE.UTF-8`.
    pub fn for_locale(name: &str) -> Result<Self> {
        let base = name.split(['.', '@']).next().unwrap_or(name).replace('-', "_");
        if base == "C" || base == "POSIX" {
            return Ok(Self::posix());
        }
        let locale = Locale::try_from(base.as_str())
            .map_err(|_| anyhow!("Unknown locale '{}'", name))?;
        Ok(Self::from_chrono_locale(locale))
    }

    /// Abbreviations of the host locale, or POSIX when it cannot be determined.
    pub fn system() -> Self {
        match sys_locale::get_locale() {
            Some(tag) => Self::for_locale(&tag).unwrap_or_else(|e| {
                log::debug!("{}, falling back to POSIX day names", e);
                Self::posix()
            }),
            None => Self::posix(),
        }
    }

    /// Resolves a `day_locale` setting: unset means POSIX, `"system"` means the host locale.
    pub fn from_setting(setting: Option<&str>) -> Result<Self> {
        match setting.map(str::trim) {
            None | Some("") => Ok(Self::posix()),
            Some(SYSTEM_LOCALE) => Ok(Self::system()),
            Some(name) => Self::for_locale(name),
        }
    }

    fn from_chrono_locale(locale: Locale) -> Self {
        // The epoch is a Thursday; four days later is a Monday.
        let monday = DateTime::<Utc>::UNIX_EPOCH + Duration::days(4);
        let abbreviations = std::array::from_fn(|offset| {
            (monday + Duration::days(offset as i64))
                .format_localized("%a", locale)
                .to_string()
        });
        Self { abbreviations }
    }

    pub fn parse(&self, token: &str) -> Option<Weekday> {
        self.abbreviations
            .iter()
            .position(|abbr| abbr == token)
            .map(|idx| WEEK[idx])
    }

    pub fn abbreviation(&self, day: Weekday) -> &str {
        &self.abbreviations[day.num_days_from_monday() as usize]
    }

    /// Comma-separated list of the accepted tokens, for error messages.
    pub fn expected(&self) -> String {
        self.abbreviations.join(", ")
    }
}

/// Today's weekday on the local wall clock.
pub fn today() -> Weekday {
    Local::now().weekday()
}
