use gardenstream_gardens::aggregator::GardenStatusAggregator;
use gardenstream_gardens::config::GardenConfig;
use gardenstream_gardens::model::{
    Sensor, SensorMeasurement, SensorMeasurementEnriched, SensorMeasurementType,
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let mut gardens = GardenStatusAggregator::new(&GardenConfig::default())?;

    let sensors = [
        Sensor::new(1, "Thermometer", "Roses"),
        Sensor::new(2, "Hygrometer", "Roses"),
        Sensor::new(3, "Anemometer", "Herbs"),
    ];
    // (sensor index, type, value, ts_ms)
    let readings = [
        (0, SensorMeasurementType::Temperature, 4.5, 5_000),
        (1, SensorMeasurementType::Humidity, 0.35, 12_000),
        (2, SensorMeasurementType::Wind, 14.0, 20_000),
        (0, SensorMeasurementType::Temperature, 6.0, 40_000),
        // Starts the second minute and closes the first one.
        (2, SensorMeasurementType::Wind, 3.0, 65_000),
        // Belongs to the closed first minute: dropped as late.
        (1, SensorMeasurementType::Humidity, 0.1, 30_000),
    ];

    let mut closed = Vec::new();
    for (sensor, kind, value, ts) in readings {
        let measurement = SensorMeasurementEnriched::new(
            SensorMeasurement::new(sensors[sensor].id, kind, value, ts),
            sensors[sensor].clone(),
        );
        closed.extend(gardens.process(&measurement)?);
    }
    closed.extend(gardens.flush()?);

    for event in closed {
        let status = &event.status;
        println!(
            "[{}, {}) garden={} measurements={} low_temp={} dry={} strong_wind={}",
            event.window_start,
            event.window_end,
            status.garden_name,
            status.measurement_count(),
            status.low_temperature_detected,
            status.dry_conditions_detected,
            status.strong_wind_detected,
        );
    }
    println!("late measurements dropped: {}", gardens.late_events_dropped());

    Ok(())
}
