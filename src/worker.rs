use log::{error, info, warn};
use crate::clock::Clock;
use crate::manager_storage::{ensure_bucket, BucketState, ObjectStore};
use crate::manager_weather::WeatherSource;
use crate::models::WeatherRecord;
use crate::snapshot::{write_snapshot, SnapshotError};

/// What happened during one run
#[derive(Debug)]
pub struct RunReport {
    pub bucket: Option<BucketState>,
    pub fetched: usize,
    pub failed: usize,
    pub object_key: Option<String>,
}

/// Runs one snapshot: makes sure the bucket is there, fetches weather for every city
/// in the given order and writes all successful records as one CSV object.
/// Nothing in here aborts the run, failures end up in the log and the report.
///
/// # Arguments
///
/// * 'weather' - source of weather records
/// * 'store' - object store to write the snapshot to
/// * 'clock' - clock for capture timestamps and the object key
/// * 'cities' - cities to fetch weather for, in processing order
/// * 'key_prefix' - key prefix for the snapshot object
pub fn run(weather: &dyn WeatherSource, store: &dyn ObjectStore, clock: &dyn Clock, cities: &[String], key_prefix: &str) -> RunReport {
    let bucket = match ensure_bucket(store) {
        Ok(state) => Some(state),
        Err(e) => {
            error!("bucket {} could not be probed, not trying to create it: {}", store.bucket_name(), e);
            None
        }
    };

    let records = fetch_all(weather, clock, cities);
    let failed = cities.len() - records.len();
    info!("fetched weather for {} of {} cities", records.len(), cities.len());

    let object_key = match write_snapshot(store, &records, clock, key_prefix) {
        Ok(key) => {
            println!("Successfully saved weather data for all cities to {}", key);
            Some(key)
        }
        Err(SnapshotError::Empty) => {
            warn!("no weather data fetched, nothing saved");
            None
        }
        Err(e) => {
            println!("Failed to save weather data: {}", e);
            None
        }
    };

    RunReport {
        bucket,
        fetched: records.len(),
        failed,
        object_key,
    }
}

/// Fetches weather for each city, skipping the ones that fail
///
/// # Arguments
///
/// * 'weather' - source of weather records
/// * 'clock' - clock for capture timestamps
/// * 'cities' - cities to fetch weather for
fn fetch_all(weather: &dyn WeatherSource, clock: &dyn Clock, cities: &[String]) -> Vec<WeatherRecord> {
    let mut records: Vec<WeatherRecord> = Vec::new();

    for city in cities {
        println!("\nFetching weather for {}...", city);
        match weather.fetch_weather(city, clock) {
            Ok(record) => {
                println!("{}", record);
                records.push(record);
            }
            Err(_) => println!("Failed to fetch weather data for {}", city),
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use super::*;
    use crate::clock::FixedClock;
    use crate::manager_storage::memory::{MemoryStore, Probe};
    use crate::manager_weather::WeatherError;

    /// Weather source answering from a fixed table, unknown cities fail with a network error
    struct TableWeather {
        table: Vec<(&'static str, f64, f64, u8, &'static str)>,
        asked: RefCell<Vec<String>>,
    }

    impl TableWeather {
        fn new(table: Vec<(&'static str, f64, f64, u8, &'static str)>) -> Self {
            Self { table, asked: RefCell::new(Vec::new()) }
        }
    }

    impl WeatherSource for TableWeather {
        fn fetch_weather(&self, city: &str, clock: &dyn Clock) -> Result<WeatherRecord, WeatherError> {
            self.asked.borrow_mut().push(city.to_string());
            self.table.iter()
                .find(|(name, ..)| *name == city)
                .map(|&(name, temperature, feels_like, humidity, description)| WeatherRecord {
                    city: name.to_string(),
                    temperature,
                    feels_like,
                    humidity,
                    description: description.to_string(),
                    timestamp: clock.timestamp(),
                })
                .ok_or(WeatherError::Network(format!("connection refused for {}", city)))
        }
    }

    fn cities(names: &[&str]) -> Vec<String> {
        names.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn failed_city_is_left_out() {
        let weather = TableWeather::new(vec![("Seattle", 61.0, 59.5, 70, "clear sky")]);
        let store = MemoryStore::new(Probe::Exists);
        let clock = FixedClock::at(2026, 10, 18, 8, 0, 0);

        let report = run(&weather, &store, &clock, &cities(&["Accra", "Seattle"]), "weather-data");

        assert_eq!(report.fetched, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.object_key.as_deref(), Some("weather-data/all-cities-20261018-080000.csv"));
        assert_eq!(*weather.asked.borrow(), cities(&["Accra", "Seattle"]));

        let objects = store.objects.borrow();
        assert_eq!(objects.len(), 1);
        let lines: Vec<&str> = objects[0].1.lines().collect();
        assert_eq!(lines, vec![
            "city,temperature,feels_like,humidity,description,timestamp",
            "Seattle,61.0,59.5,70,clear sky,20261018-080000",
        ]);
    }

    #[test]
    fn rows_follow_city_order() {
        let weather = TableWeather::new(vec![
            ("Seattle", 61.0, 59.5, 70, "clear sky"),
            ("Douala", 80.1, 86.0, 84, "overcast clouds"),
            ("Philadelphia", 55.4, 53.9, 62, "mist"),
        ]);
        let store = MemoryStore::new(Probe::Exists);
        let clock = FixedClock::at(2026, 10, 18, 8, 0, 0);

        run(&weather, &store, &clock, &cities(&["Philadelphia", "Yaounde", "Seattle", "Douala"]), "weather-data");

        let objects = store.objects.borrow();
        assert_eq!(objects.len(), 1);
        let order: Vec<&str> = objects[0].1.lines()
            .skip(1)
            .map(|line| line.split(',').next().unwrap_or_default())
            .collect();
        assert_eq!(order, vec!["Philadelphia", "Seattle", "Douala"]);
    }

    #[test]
    fn nothing_written_when_all_fail() {
        let weather = TableWeather::new(vec![]);
        let store = MemoryStore::new(Probe::Exists);
        let clock = FixedClock::at(2026, 10, 18, 8, 0, 0);

        let report = run(&weather, &store, &clock, &cities(&["Accra", "Kumasi"]), "weather-data");

        assert_eq!(report.fetched, 0);
        assert_eq!(report.failed, 2);
        assert!(report.object_key.is_none());
        assert!(store.objects.borrow().is_empty());
    }

    #[test]
    fn missing_bucket_is_created_before_writing() {
        let weather = TableWeather::new(vec![("Seattle", 61.0, 59.5, 70, "clear sky")]);
        let store = MemoryStore::new(Probe::Missing);
        let clock = FixedClock::at(2026, 10, 18, 8, 0, 0);

        let report = run(&weather, &store, &clock, &cities(&["Seattle"]), "weather-data");

        assert_eq!(report.bucket, Some(BucketState::Created));
        assert_eq!(store.create_calls.get(), 1);
        assert_eq!(store.objects.borrow().len(), 1);
    }

    #[test]
    fn forbidden_bucket_does_not_stop_the_run() {
        let weather = TableWeather::new(vec![("Seattle", 61.0, 59.5, 70, "clear sky")]);
        let store = MemoryStore::new(Probe::Forbidden);
        let clock = FixedClock::at(2026, 10, 18, 8, 0, 0);

        let report = run(&weather, &store, &clock, &cities(&["Seattle"]), "weather-data");

        assert!(report.bucket.is_none());
        assert_eq!(store.create_calls.get(), 0);
        assert_eq!(report.fetched, 1);
        assert_eq!(store.objects.borrow().len(), 1);
    }

    #[test]
    fn upload_failure_is_not_fatal() {
        let weather = TableWeather::new(vec![("Seattle", 61.0, 59.5, 70, "clear sky")]);
        let mut store = MemoryStore::new(Probe::Exists);
        store.fail_put = true;
        let clock = FixedClock::at(2026, 10, 18, 8, 0, 0);

        let report = run(&weather, &store, &clock, &cities(&["Seattle"]), "weather-data");

        assert_eq!(report.fetched, 1);
        assert!(report.object_key.is_none());
    }
}
