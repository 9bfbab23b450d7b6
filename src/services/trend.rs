use crate::models::mood::Mood;
use crate::models::weekly_summary::TrendPoint;

/// Chart value for a mood label. Unknown labels sit at the neutral line.
pub fn trend_value(label: &str) -> f64 {
    Mood::new(label).trend_value()
}

/// One point per mood, in chronological order. No smoothing.
pub fn trend_points(moods: &[Mood]) -> Vec<TrendPoint> {
    moods
        .iter()
        .enumerate()
        .map(|(x, mood)| TrendPoint {
            x,
            y: mood.trend_value(),
            mood: mood.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_table() {
        assert_eq!(trend_value("Happy"), 3.0);
        assert_eq!(trend_value("Calm"), 2.5);
        assert_eq!(trend_value("Neutral"), 2.0);
        assert_eq!(trend_value("Sad"), 1.0);
        assert_eq!(trend_value("Angry"), 0.5);
    }

    #[test]
    fn unknown_labels_map_to_default() {
        assert_eq!(trend_value("Bored"), 2.0);
        assert_eq!(trend_value(""), 2.0);
        assert_eq!(trend_value("Excited"), 2.0);
        assert_eq!(trend_value("Stressed"), 2.0);
    }

    #[test]
    fn lowercase_labels_are_not_in_the_table() {
        assert_eq!(trend_value("happy"), 2.0);
        assert_eq!(trend_value("sad"), 2.0);
        assert_eq!(trend_value(" Happy"), 2.0);
    }

    #[test]
    fn points_keep_chronological_order() {
        let moods: Vec<Mood> = ["Sad", "Happy", "Calm"].iter().map(|m| Mood::new(*m)).collect();

        let points = trend_points(&moods);

        let ys: Vec<f64> = points.iter().map(|p| p.y).collect();
        let xs: Vec<usize> = points.iter().map(|p| p.x).collect();
        assert_eq!(ys, vec![1.0, 3.0, 2.5]);
        assert_eq!(xs, vec![0, 1, 2]);
    }
}
