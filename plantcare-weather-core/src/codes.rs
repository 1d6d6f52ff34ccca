//! WMO weather-code tables used by the Open-Meteo provider.

use std::ops::RangeInclusive;

use crate::model::Sky;

pub const UNKNOWN_DESCRIPTION: &str = "Desconocido";
pub const DEFAULT_ICON: &str = "01d";

const DESCRIPTIONS: &[(i64, &str)] = &[
    (0, "Despejado"),
    (1, "Mayormente despejado"),
    (2, "Parcialmente nublado"),
    (3, "Nublado"),
    (45, "Niebla"),
    (48, "Niebla helada"),
    (51, "Llovizna ligera"),
    (53, "Llovizna moderada"),
    (55, "Llovizna densa"),
    (56, "Llovizna helada ligera"),
    (57, "Llovizna helada densa"),
    (61, "Lluvia ligera"),
    (63, "Lluvia moderada"),
    (65, "Lluvia intensa"),
    (66, "Lluvia helada ligera"),
    (67, "Lluvia helada intensa"),
    (71, "Nieve ligera"),
    (73, "Nieve moderada"),
    (75, "Nieve intensa"),
    (77, "Granos de nieve"),
    (80, "Chubascos ligeros"),
    (81, "Chubascos moderados"),
    (82, "Chubascos intensos"),
    (85, "Chubascos de nieve ligeros"),
    (86, "Chubascos de nieve intensos"),
    (95, "Tormenta"),
    (96, "Tormenta con granizo ligero"),
    (99, "Tormenta con granizo intenso"),
];

// First matching range wins.
const ICONS: &[(RangeInclusive<i64>, &str)] = &[
    (0..=1, "01d"),
    (2..=2, "02d"),
    (3..=3, "03d"),
    (45..=48, "50d"),
    (51..=67, "09d"),
    (71..=77, "13d"),
    (80..=86, "09d"),
    (95..=99, "11d"),
];

/// Spanish description for a weather code, or [`UNKNOWN_DESCRIPTION`].
pub fn describe(code: i64) -> &'static str {
    DESCRIPTIONS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, text)| *text)
        .unwrap_or(UNKNOWN_DESCRIPTION)
}

/// Icon code for a weather code, or [`DEFAULT_ICON`].
pub fn icon_for(code: i64) -> &'static str {
    ICONS
        .iter()
        .find(|(range, _)| range.contains(&code))
        .map(|(_, icon)| *icon)
        .unwrap_or(DEFAULT_ICON)
}

/// Coarse sky condition for a weather code. Drizzle, snow and storms are
/// [`Sky::Other`]; only rain and rain showers count as rain.
pub fn sky_for(code: i64) -> Sky {
    match code {
        0 | 1 => Sky::Clear,
        2 | 3 => Sky::Clouds,
        61..=67 | 80..=82 => Sky::Rain,
        _ => Sky::Other,
    }
}

/// Every code with a known description.
pub fn known_codes() -> impl Iterator<Item = i64> {
    DESCRIPTIONS.iter().map(|(code, _)| *code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_descriptions() {
        let expected = [
            (0, "Despejado"),
            (1, "Mayormente despejado"),
            (2, "Parcialmente nublado"),
            (3, "Nublado"),
            (45, "Niebla"),
            (48, "Niebla helada"),
            (51, "Llovizna ligera"),
            (53, "Llovizna moderada"),
            (55, "Llovizna densa"),
            (56, "Llovizna helada ligera"),
            (57, "Llovizna helada densa"),
            (61, "Lluvia ligera"),
            (63, "Lluvia moderada"),
            (65, "Lluvia intensa"),
            (66, "Lluvia helada ligera"),
            (67, "Lluvia helada intensa"),
            (71, "Nieve ligera"),
            (73, "Nieve moderada"),
            (75, "Nieve intensa"),
            (77, "Granos de nieve"),
            (80, "Chubascos ligeros"),
            (81, "Chubascos moderados"),
            (82, "Chubascos intensos"),
            (85, "Chubascos de nieve ligeros"),
            (86, "Chubascos de nieve intensos"),
            (95, "Tormenta"),
            (96, "Tormenta con granizo ligero"),
            (99, "Tormenta con granizo intenso"),
        ];
        for (code, text) in expected {
            assert_eq!(describe(code), text, "code {code}");
        }
        assert_eq!(known_codes().count(), expected.len());
    }

    #[test]
    fn icon_table_boundaries() {
        let cases = [
            (0, "01d"),
            (1, "01d"),
            (2, "02d"),
            (3, "03d"),
            (44, "01d"),
            (45, "50d"),
            (48, "50d"),
            (49, "01d"),
            (50, "01d"),
            (51, "09d"),
            (67, "09d"),
            (68, "01d"),
            (70, "01d"),
            (71, "13d"),
            (77, "13d"),
            (78, "01d"),
            (79, "01d"),
            (80, "09d"),
            (86, "09d"),
            (87, "01d"),
            (94, "01d"),
            (95, "11d"),
            (99, "11d"),
            (100, "01d"),
        ];
        for (code, icon) in cases {
            assert_eq!(icon_for(code), icon, "code {code}");
        }
    }

    #[test]
    fn unknown_codes_fall_back() {
        for code in [-1, 4, 10, 46, 50, 52, 60, 68, 76, 83, 90, 97, 98, 100, 1000] {
            assert_eq!(describe(code), UNKNOWN_DESCRIPTION, "code {code}");
        }
        // Undescribed codes inside a range still take that range's icon.
        assert_eq!(icon_for(52), "09d");
        assert_eq!(icon_for(97), "11d");
        for code in [-1, 4, 44, 49, 68, 70, 78, 87, 94, 100, 1000] {
            assert_eq!(icon_for(code), DEFAULT_ICON, "code {code}");
        }
    }

    #[test]
    fn sky_separates_rain_from_drizzle_and_snow() {
        assert_eq!(sky_for(0), Sky::Clear);
        assert_eq!(sky_for(3), Sky::Clouds);
        for code in [61, 65, 67, 80, 82] {
            assert_eq!(sky_for(code), Sky::Rain, "code {code}");
        }
        // Same `09d` icon as rain, but not rain.
        for code in [51, 53, 55, 56, 57, 85, 86, 71, 45, 95] {
            assert_eq!(sky_for(code), Sky::Other, "code {code}");
        }
    }
}
