use log::{ConsoleLogger, LogLevel};
use orderedmap::{OrderedMap, OrderedMapOptions};

const LOG_ENV: &str = "ORDEREDMAP_LOG";

fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let level = match std::env::var(LOG_ENV) {
        Ok(value) => value.parse::<LogLevel>()?,
        Err(_) => LogLevel::Info,
    };

    log::set_logger(ConsoleLogger)?;
    log::set_log_filter(level);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging()?;

    let options = OrderedMapOptions::new().initial_capacity(4).load_factor(0.75);
    let mut map = OrderedMap::with_options(options)?;

    for (key, value) in [("a", 1), ("b", 2), ("c", 3)] {
        map.insert(key, value);
        log::info!("insert {key}={value} => {map}");
    }

    map.remove("b");
    log::info!("remove b => {map}");

    map.insert("d", 4);
    log::info!("insert d=4 => {map}");

    map.insert("a", 10);
    log::info!("overwrite a=10 => {map}");

    let mut cursor = map.entries_cursor();
    while let Some((_, value)) = cursor.next() {
        if *value == 3 {
            cursor.remove();
        }
    }
    log::info!("remove entries with value 3 => {map}");

    map.sort_keys_by(|a, b| b.cmp(a));
    log::info!("sorted descending => {map}");

    map.check_consistency()?;
    println!("{map}");
    Ok(())
}
