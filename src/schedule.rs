//! Stop-time projection: turns departure times and inter-stop travel
//! minutes into an arrival time at every stop.

use chrono::{Duration, NaiveTime};
use thiserror::Error;

use crate::record::Stop;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("malformed departure time {0:?}, expected HH:MM")]
    MalformedTime(String),
    #[error("line has no stops")]
    EmptyStopSequence,
}

/// Arrival at one stop for one departure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopTime {
    pub stop: String,
    pub time: NaiveTime,
}

/// The full run of a line for one departure: the origin time and the
/// arrival time at every stop, in stop order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trip {
    pub departure: NaiveTime,
    pub stop_times: Vec<StopTime>,
}

/// Projects each departure across the stop sequence.
///
/// Arrival at the first stop is the departure itself; each subsequent
/// arrival adds that stop's `minutes_from_previous`. The addition wraps at
/// midnight, so a run leaving at 23:50 with a 20-minute leg arrives at
/// 00:10.
///
/// # Errors
///
/// Returns [`ScheduleError::EmptyStopSequence`] if `stops` is empty and
/// [`ScheduleError::MalformedTime`] for any departure that does not parse
/// as "HH:MM". Negative or implausible durations are not validated.
pub fn project(departures: &[String], stops: &[Stop]) -> Result<Vec<Trip>, ScheduleError> {
    if stops.is_empty() {
        return Err(ScheduleError::EmptyStopSequence);
    }

    let mut trips = Vec::with_capacity(departures.len());

    for departure in departures {
        let origin = NaiveTime::parse_from_str(departure, "%H:%M")
            .map_err(|_| ScheduleError::MalformedTime(departure.clone()))?;

        let mut stop_times = Vec::with_capacity(stops.len());
        let mut current = origin;

        stop_times.push(StopTime {
            stop: stops[0].name.clone(),
            time: current,
        });

        for stop in &stops[1..] {
            current += Duration::minutes(i64::from(stop.minutes_from_previous));
            stop_times.push(StopTime {
                stop: stop.name.clone(),
                time: current,
            });
        }

        trips.push(Trip {
            departure: origin,
            stop_times,
        });
    }

    Ok(trips)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stops(spec: &[(&str, u32)]) -> Vec<Stop> {
        spec.iter()
            .map(|&(name, minutes_from_previous)| Stop {
                name: name.to_string(),
                minutes_from_previous,
            })
            .collect()
    }

    fn hhmm(time: NaiveTime) -> String {
        time.format("%H:%M").to_string()
    }

    #[test]
    fn test_worked_example() {
        let stops = stops(&[("A", 0), ("B", 5), ("C", 7)]);
        let departures = vec!["08:00".to_string(), "08:30".to_string()];

        let trips = project(&departures, &stops).unwrap();

        assert_eq!(trips.len(), 2);

        let first: Vec<(String, String)> = trips[0]
            .stop_times
            .iter()
            .map(|st| (st.stop.clone(), hhmm(st.time)))
            .collect();
        assert_eq!(
            first,
            vec![
                ("A".to_string(), "08:00".to_string()),
                ("B".to_string(), "08:05".to_string()),
                ("C".to_string(), "08:12".to_string()),
            ]
        );

        let second: Vec<String> = trips[1].stop_times.iter().map(|st| hhmm(st.time)).collect();
        assert_eq!(second, vec!["08:30", "08:35", "08:42"]);
    }

    #[test]
    fn test_output_shape_matches_input_lengths() {
        let stops = stops(&[("A", 0), ("B", 3), ("C", 4), ("D", 2)]);
        let departures: Vec<String> = ["06:00", "07:15", "09:40"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let trips = project(&departures, &stops).unwrap();

        assert_eq!(trips.len(), departures.len());
        for trip in &trips {
            assert_eq!(trip.stop_times.len(), stops.len());
        }
    }

    #[test]
    fn test_first_stop_is_the_departure() {
        // The first stop's minutes value is ignored even when nonzero.
        let stops = stops(&[("A", 99), ("B", 1)]);
        let trips = project(&["12:34".to_string()], &stops).unwrap();

        assert_eq!(trips[0].stop_times[0].time, trips[0].departure);
        assert_eq!(hhmm(trips[0].stop_times[0].time), "12:34");
        assert_eq!(hhmm(trips[0].stop_times[1].time), "12:35");
    }

    #[test]
    fn test_arrivals_accumulate() {
        let stops = stops(&[("A", 0), ("B", 10), ("C", 25)]);
        let trips = project(&["10:00".to_string()], &stops).unwrap();
        let times = &trips[0].stop_times;

        for i in 1..times.len() {
            let expected = times[i - 1].time
                + Duration::minutes(i64::from(stops[i].minutes_from_previous));
            assert_eq!(times[i].time, expected);
        }
    }

    #[test]
    fn test_wraps_past_midnight() {
        let stops = stops(&[("A", 0), ("B", 20)]);
        let trips = project(&["23:50".to_string()], &stops).unwrap();

        assert_eq!(hhmm(trips[0].stop_times[1].time), "00:10");
    }

    #[test]
    fn test_empty_stop_sequence() {
        let err = project(&["08:00".to_string()], &[]).unwrap_err();
        assert_eq!(err, ScheduleError::EmptyStopSequence);
    }

    #[test]
    fn test_malformed_time() {
        let stops = stops(&[("A", 0)]);
        let err = project(&["8 sati".to_string()], &stops).unwrap_err();
        assert_eq!(err, ScheduleError::MalformedTime("8 sati".to_string()));
    }

    #[test]
    fn test_no_departures_yields_no_trips() {
        let stops = stops(&[("A", 0)]);
        assert!(project(&[], &stops).unwrap().is_empty());
    }
}
