use shared::{Advisory, ColorTag, RouteCandidate};

use crate::scoring::ScoreBands;

/// Night for advisory purposes runs from 20:00 through 05:59.
fn is_night(hour: u32) -> bool {
    hour >= 20 || hour < 6
}

/// The narrower window used for latent-risk heuristics, 22:00 through 04:59.
fn is_late_night(hour: u32) -> bool {
    hour >= 22 || hour < 5
}

/// Compose the advisory for one candidate at the given hour (0..=23).
///
/// The text is assembled in a fixed order so identical inputs always yield
/// identical output: band base text, then the night addendum when the hour
/// falls in the night window, then any latent-risk section.
pub fn advise(candidate: &RouteCandidate, hour: u32) -> Advisory {
    advise_with_bands(candidate, hour, &ScoreBands::default())
}

pub fn advise_with_bands(candidate: &RouteCandidate, hour: u32, bands: &ScoreBands) -> Advisory {
    let night = is_night(hour);
    let mut text = String::new();

    if candidate.safety_score > bands.green_above {
        text.push_str(
            "Safe choice: high visibility area with frequent police patrols and all-night shops. \
             Recommended for solo and vulnerable travelers.",
        );
        if night {
            text.push_str(" Even on a safe route, stay vigilant at night.");
        }
    } else if candidate.safety_score < bands.red_below {
        text.push_str("High risk: poor lighting and reported isolation.");
        if night {
            text.push_str(" Extreme caution: avoid this route if travelling alone at night.");
        } else {
            text.push_str(" Not recommended for solo travel.");
        }
    } else {
        text.push_str("Moderate: main roads available but some dark patches.");
        if night {
            text.push_str(
                " Carry a torch or stay on the phone with a contact. \
                 Stay on the main street and avoid alleys.",
            );
        }
    }

    if let Some(latent) = predict_risk(candidate, hour) {
        text.push_str("\n\n");
        text.push_str(&latent);
    }

    Advisory {
        text,
        is_night_context: night,
    }
}

/// Heuristic latent-risk factors keyed on the candidate's color tag.
///
/// Red corridors always carry the industrial-zone factor and pick up a
/// foot-traffic factor late at night. Yellow corridors only surface a
/// factor late at night. Green corridors flag the small-hours window when
/// even patrolled areas thin out.
pub fn predict_risk(candidate: &RouteCandidate, hour: u32) -> Option<String> {
    let mut factors: Vec<&str> = Vec::new();

    match candidate.color {
        ColorTag::Red => {
            factors.push("industrial or low-populated zone on this corridor");
            if is_late_night(hour) {
                factors.push("history of lower foot traffic after 10 PM");
            }
        }
        ColorTag::Yellow => {
            if is_late_night(hour) {
                factors.push("nearby parks may be unlit and isolated at this hour");
            }
        }
        ColorTag::Green => {
            if (2..5).contains(&hour) {
                factors.push("reduced police presence in the small hours");
            }
        }
    }

    if factors.is_empty() {
        None
    } else {
        Some(format!("Potential latent risks: {}.", factors.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::GeoPoint;

    fn candidate(score: i32, color: ColorTag) -> RouteCandidate {
        RouteCandidate {
            id: 1,
            name: "Safest Path".to_string(),
            color,
            safety_score: score,
            distance_km: 3.1,
            eta_minutes: 41,
            eta: "41 mins".to_string(),
            path: vec![
                GeoPoint {
                    lat: 18.932,
                    lng: 72.83,
                },
                GeoPoint {
                    lat: 18.95,
                    lng: 72.845,
                },
            ],
            features: vec![],
        }
    }

    #[test]
    fn test_green_at_night_adds_vigilance_note() {
        let advisory = advise(&candidate(94, ColorTag::Green), 23);
        assert!(advisory.text.starts_with("Safe choice"));
        assert!(advisory.text.contains("stay vigilant at night"));
        assert!(!advisory.text.contains("Potential latent risks"));
        assert!(advisory.is_night_context);
    }

    #[test]
    fn test_green_by_day_is_plain() {
        let advisory = advise(&candidate(94, ColorTag::Green), 12);
        assert!(advisory.text.starts_with("Safe choice"));
        assert!(!advisory.text.contains("stay vigilant"));
        assert!(!advisory.text.contains("Potential latent risks"));
        assert!(!advisory.is_night_context);
    }

    #[test]
    fn test_green_small_hours_flags_thin_patrols() {
        let advisory = advise(&candidate(94, ColorTag::Green), 3);
        assert!(advisory.text.contains("reduced police presence"));
    }

    #[test]
    fn test_green_small_hours_window_boundaries() {
        assert!(predict_risk(&candidate(94, ColorTag::Green), 2).is_some());
        assert!(predict_risk(&candidate(94, ColorTag::Green), 4).is_some());
        assert!(predict_risk(&candidate(94, ColorTag::Green), 5).is_none());
        assert!(predict_risk(&candidate(94, ColorTag::Green), 1).is_none());
    }

    #[test]
    fn test_red_at_night_escalates() {
        let advisory = advise(&candidate(48, ColorTag::Red), 23);
        assert!(advisory.text.starts_with("High risk"));
        assert!(advisory.text.contains("Extreme caution"));
        assert!(advisory.text.contains("industrial or low-populated zone"));
        assert!(advisory.text.contains("lower foot traffic after 10 PM"));
    }

    #[test]
    fn test_red_by_day_keeps_solo_warning_and_zone_factor() {
        let advisory = advise(&candidate(48, ColorTag::Red), 12);
        assert!(advisory.text.contains("Not recommended for solo travel"));
        assert!(advisory.text.contains("industrial or low-populated zone"));
        assert!(!advisory.text.contains("lower foot traffic"));
    }

    #[test]
    fn test_yellow_late_night_gets_both_addenda() {
        let advisory = advise(&candidate(72, ColorTag::Yellow), 23);
        assert!(advisory.text.starts_with("Moderate"));
        assert!(advisory.text.contains("Carry a torch"));
        assert!(advisory.text.contains("nearby parks"));
    }

    #[test]
    fn test_yellow_early_night_has_no_latent_section() {
        // 21:00 is night but not yet late night.
        let advisory = advise(&candidate(72, ColorTag::Yellow), 21);
        assert!(advisory.text.contains("Carry a torch"));
        assert!(!advisory.text.contains("Potential latent risks"));
    }

    #[test]
    fn test_yellow_by_day_is_base_text_only() {
        let advisory = advise(&candidate(72, ColorTag::Yellow), 12);
        assert_eq!(
            advisory.text,
            "Moderate: main roads available but some dark patches."
        );
    }

    #[test]
    fn test_latent_factors_join_with_semicolons() {
        let latent = predict_risk(&candidate(48, ColorTag::Red), 23).unwrap();
        assert!(latent.starts_with("Potential latent risks: "));
        assert!(latent.contains("; "));
        assert!(latent.ends_with('.'));
    }

    #[test]
    fn test_base_text_precedes_latent_section() {
        let advisory = advise(&candidate(48, ColorTag::Red), 23);
        let base = advisory.text.find("High risk").unwrap();
        let latent = advisory.text.find("Potential latent risks").unwrap();
        assert!(base < latent);
    }

    #[test]
    fn test_night_window_boundaries() {
        let green = candidate(94, ColorTag::Green);
        assert!(advise(&green, 20).is_night_context);
        assert!(!advise(&green, 19).is_night_context);
        assert!(advise(&green, 5).is_night_context);
        assert!(!advise(&green, 6).is_night_context);
    }

    #[test]
    fn test_same_inputs_same_advisory() {
        let green = candidate(94, ColorTag::Green);
        let night = advise(&green, 23);
        let day = advise(&green, 12);
        assert_ne!(night.text, day.text);
        assert_eq!(advise(&green, 23).text, night.text);
        assert_eq!(advise(&green, 12).text, day.text);
    }

    #[test]
    fn test_custom_bands_shift_base_text() {
        let generous = ScoreBands {
            green_above: 70,
            red_below: 30,
        };
        let advisory = advise_with_bands(&candidate(72, ColorTag::Yellow), 12, &generous);
        assert!(advisory.text.starts_with("Safe choice"));
    }
}
