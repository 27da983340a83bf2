use std::thread;

use gardenstream_core::channel::IngestionPoint;
use gardenstream_gardens::aggregator::{GardenStatusAggregator, GardenStatusEvent};
use gardenstream_gardens::config::GardenConfig;
use gardenstream_gardens::model::{
    Sensor, SensorMeasurement, SensorMeasurementEnriched, SensorMeasurementType,
};
use gardenstream_gardens::rules::GardenRules;

fn measurement(
    garden: &str,
    kind: SensorMeasurementType,
    value: f64,
    ts: i64,
) -> SensorMeasurementEnriched {
    SensorMeasurementEnriched::new(
        SensorMeasurement::new(1, kind, value, ts),
        Sensor::new(1, "Sensor 1", garden),
    )
}

fn gardens() -> GardenStatusAggregator {
    GardenStatusAggregator::new(&GardenConfig::default()).unwrap()
}

#[test]
fn test_window_closes_when_next_minute_starts() {
    let mut gardens = gardens();

    let out = gardens
        .process(&measurement("G1", SensorMeasurementType::Temperature, 4.5, 5_000))
        .unwrap();
    assert!(out.is_empty());

    let out = gardens
        .process(&measurement("G2", SensorMeasurementType::Humidity, 20.0, 65_000))
        .unwrap();
    assert_eq!(out.len(), 1);

    let event = &out[0];
    assert_eq!((event.window_start, event.window_end), (0, 60_000));
    assert_eq!(event.status.garden_name, "G1");
    assert_eq!(event.status.measurement_count(), 1);
    assert_eq!(event.status.temperature.count, 1);
    assert_eq!(event.status.temperature.min, Some(4.5));
    assert_eq!(event.status.humidity.count, 0);
}

#[test]
fn test_gardens_in_same_window_emit_separately() {
    let mut gardens = gardens();

    gardens
        .process(&measurement("G1", SensorMeasurementType::Wind, 4.0, 1_000))
        .unwrap();
    gardens
        .process(&measurement("G2", SensorMeasurementType::Wind, 12.0, 2_000))
        .unwrap();
    let out = gardens
        .process(&measurement("G1", SensorMeasurementType::Wind, 1.0, 61_000))
        .unwrap();

    assert_eq!(out.len(), 2);
    assert_eq!(out[0].status.garden_name, "G1");
    assert_eq!(out[0].status.wind.max, Some(4.0));
    assert!(!out[0].status.strong_wind_detected);
    assert_eq!(out[1].status.garden_name, "G2");
    assert_eq!(out[1].status.wind.max, Some(12.0));
    assert!(out[1].status.strong_wind_detected);
}

#[test]
fn test_low_temperature_flag_comes_from_the_fold() {
    let mut gardens = gardens();

    gardens
        .process(&measurement("G1", SensorMeasurementType::Temperature, 4.5, 1_000))
        .unwrap();
    gardens
        .process(&measurement("G1", SensorMeasurementType::Temperature, 12.0, 2_000))
        .unwrap();
    let out = gardens.flush().unwrap();

    let status = &out[0].status;
    assert!(status.low_temperature_detected);
    assert_eq!(status.temperature.average(), Some(8.25));
    assert_eq!(status.temperature.last.map(|r| r.value), Some(12.0));
}

#[test]
fn test_rules_thresholds_are_configurable() {
    let config = GardenConfig {
        rules: GardenRules {
            low_temperature_threshold: 0.0,
            ..GardenRules::default()
        },
        ..GardenConfig::default()
    };
    let mut gardens = GardenStatusAggregator::new(&config).unwrap();

    gardens
        .process(&measurement("G1", SensorMeasurementType::Temperature, 4.5, 1_000))
        .unwrap();
    let out = gardens.flush().unwrap();
    assert!(!out[0].status.low_temperature_detected);
}

#[test]
fn test_late_measurement_is_dropped() {
    let mut gardens = gardens();

    gardens
        .process(&measurement("G1", SensorMeasurementType::Humidity, 0.5, 1_000))
        .unwrap();
    gardens
        .process(&measurement("G1", SensorMeasurementType::Humidity, 0.5, 60_000))
        .unwrap();
    let out = gardens
        .process(&measurement("G1", SensorMeasurementType::Humidity, 0.1, 59_000))
        .unwrap();

    assert!(out.is_empty());
    assert_eq!(gardens.late_events_dropped(), 1);
    assert_eq!(gardens.open_window_count(), 1);
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = GardenConfig {
        window_size_ms: 0,
        ..GardenConfig::default()
    };
    assert!(GardenStatusAggregator::new(&config).is_err());
}

#[test]
fn test_status_event_json_is_flat() {
    let mut gardens = gardens();
    gardens
        .process(&measurement("Roses", SensorMeasurementType::Temperature, 18.0, 1_000))
        .unwrap();
    let event = gardens.flush().unwrap().remove(0);

    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["windowStart"], 0);
    assert_eq!(json["windowEnd"], 60_000);
    assert_eq!(json["gardenName"], "Roses");
    assert_eq!(json["temperature"]["count"], 1);

    let back: GardenStatusEvent = serde_json::from_value(json).unwrap();
    assert_eq!(back, event);
}

#[test]
fn test_sensors_on_separate_threads_feed_one_aggregator() {
    let mut gardens = gardens();
    let point = IngestionPoint::new(8);

    let producers: Vec<_> = [
        ("G1", SensorMeasurementType::Temperature),
        ("G1", SensorMeasurementType::Wind),
        ("G2", SensorMeasurementType::Humidity),
    ]
    .into_iter()
    .map(|(garden, kind)| {
        let sender = point.sender();
        thread::spawn(move || {
            for i in 0..10 {
                sender
                    .send(measurement(garden, kind, 1.0, 1_000 + i))
                    .unwrap();
            }
        })
    })
    .collect();

    let mut events = Vec::new();
    let stats = point
        .drive(gardens.aggregator_mut(), |e| {
            events.push(GardenStatusEvent::from(e))
        })
        .unwrap();
    for p in producers {
        p.join().unwrap();
    }

    assert_eq!(stats.events_received, 30);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].status.garden_name, "G1");
    assert_eq!(events[0].status.measurement_count(), 20);
    assert_eq!(events[1].status.garden_name, "G2");
    assert_eq!(events[1].status.humidity.count, 10);
    assert_eq!(gardens.open_window_count(), 0);
}
