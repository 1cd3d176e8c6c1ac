//! Open-Meteo (WMO) weather code descriptions

/// Convert an Open-Meteo weather code to a lowercase description.
///
/// Codes outside the supported set map to `"unknown"`.
#[must_use]
pub fn describe(code: i64) -> &'static str {
    match code {
        0 => "clear sky",
        1 => "mainly clear",
        2 => "partly cloudy",
        3 => "overcast",
        45 => "fog",
        48 => "depositing rime fog",
        51 => "light drizzle",
        53 => "moderate drizzle",
        55 => "dense drizzle",
        61 => "slight rain",
        63 => "moderate rain",
        65 => "heavy rain",
        71 => "slight snow",
        73 => "moderate snow",
        75 => "heavy snow",
        95 => "thunderstorm",
        _ => "unknown",
    }
}
