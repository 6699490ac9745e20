use temp_pipeline::{
    AdcCalibration, MemorySink, Pipeline, PipelineConfig, ScriptedSensor, SensorError,
};

fn config() -> PipelineConfig {
    PipelineConfig {
        sample_period_ms: 0,
        channel_capacity_bytes: 64 * 8,
        ..PipelineConfig::default()
    }
}

#[test]
fn failed_read_repeats_last_good_reading() {
    let cal = AdcCalibration::ONBOARD;
    let sensor = ScriptedSensor::new([Ok(860), Err(SensorError::ReadFailed), Ok(880)]);
    let sink = MemorySink::new();

    let summary = Pipeline::launch(&config(), sensor, sink.clone())
        .unwrap()
        .join()
        .unwrap();

    let raw: Vec<f32> = sink.reports().iter().map(|r| r.raw).collect();
    assert_eq!(raw, vec![cal.to_celsius(860), cal.to_celsius(860), cal.to_celsius(880)]);
    assert_eq!(summary.metrics.sensor_failures, 1);
    assert_eq!(summary.metrics.substituted_readings, 1);
}

#[test]
fn failures_before_first_reading_are_skipped() {
    let sensor = ScriptedSensor::new([
        Err(SensorError::ReadFailed),
        Ok(9999),
        Ok(870),
    ]);
    let sink = MemorySink::new();

    let summary = Pipeline::launch(&config(), sensor, sink.clone())
        .unwrap()
        .join()
        .unwrap();

    assert_eq!(sink.len(), 1);
    assert_eq!(summary.metrics.sensor_failures, 2);
    assert_eq!(summary.metrics.substituted_readings, 0);
}

#[test]
fn tiny_channel_budget_is_a_startup_error() {
    let config = PipelineConfig {
        channel_capacity_bytes: 4,
        ..config()
    };
    let result = Pipeline::launch(&config, ScriptedSensor::from_codes([870]), MemorySink::new());
    assert!(result.is_err());
}
