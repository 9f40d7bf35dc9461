//! Visiting order for a set of resolved systems.
//!
//! [`plot_journey`] applies the nearest-neighbour heuristic: starting from a
//! point, it repeatedly moves to the closest unvisited stop. The result keeps
//! individual hops short but is not guaranteed to minimise the total length.

use std::cmp::Ordering;

use crate::geometry::distance;
use crate::system::SystemPoint;

/// One stop of a plotted journey.
#[derive(Debug, Clone, PartialEq)]
pub struct JourneyStop<T> {
    pub item: T,
    /// Distance from the previous stop, or from the start for the first stop.
    pub leg_distance: f64,
}

/// Order `items` by nearest neighbour, starting at `start`.
///
/// Ties go to the item that came first in `items`.
pub fn plot_journey<T, F>(start: SystemPoint, items: Vec<T>, position: F) -> Vec<JourneyStop<T>>
where
    F: Fn(&T) -> SystemPoint,
{
    let mut unvisited = items;
    let mut ordered = Vec::with_capacity(unvisited.len());
    let mut current = start;

    while let Some((index, leg_distance)) = unvisited
        .iter()
        .enumerate()
        .map(|(index, item)| (index, distance(&current, &position(item))))
        .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(Ordering::Equal))
    {
        let item = unvisited.remove(index);
        current = position(&item);
        ordered.push(JourneyStop { item, leg_distance });
    }

    ordered
}

/// Sum of every leg of a plotted journey.
pub fn journey_length<T>(stops: &[JourneyStop<T>]) -> f64 {
    stops.iter().map(|stop| stop.leg_distance).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(x: f64, y: f64) -> SystemPoint {
        SystemPoint::new(x, y, 0.0)
    }

    #[test]
    fn visits_closest_stop_first() {
        let stops = vec![
            ("far", point(10.0, 0.0)),
            ("near", point(1.0, 0.0)),
            ("mid", point(4.0, 0.0)),
        ];

        let journey = plot_journey(point(0.0, 0.0), stops, |(_, p)| *p);

        let names: Vec<_> = journey.iter().map(|stop| stop.item.0).collect();
        assert_eq!(names, vec!["near", "mid", "far"]);
        let legs: Vec<_> = journey.iter().map(|stop| stop.leg_distance).collect();
        assert_eq!(legs, vec![1.0, 3.0, 6.0]);
        assert_eq!(journey_length(&journey), 10.0);
    }

    #[test]
    fn greedy_choice_follows_the_current_stop() {
        // from B the closest stop is D, even though C is closer to the start
        let stops = vec![
            ("B", point(2.0, 0.0)),
            ("C", point(-3.0, 0.0)),
            ("D", point(2.0, 2.0)),
        ];

        let journey = plot_journey(point(0.0, 0.0), stops, |(_, p)| *p);

        let names: Vec<_> = journey.iter().map(|stop| stop.item.0).collect();
        assert_eq!(names, vec!["B", "D", "C"]);
    }

    #[test]
    fn ties_keep_input_order_and_empty_input_is_empty() {
        let stops = vec![("first", point(1.0, 0.0)), ("second", point(-1.0, 0.0))];
        let journey = plot_journey(point(0.0, 0.0), stops, |(_, p)| *p);
        assert_eq!(journey[0].item.0, "first");

        let empty: Vec<JourneyStop<()>> =
            plot_journey(point(0.0, 0.0), Vec::new(), |_| point(0.0, 0.0));
        assert!(empty.is_empty());
    }
}
