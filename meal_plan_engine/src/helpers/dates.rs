use chrono::{DateTime, Local, NaiveDate, NaiveTime, Utc};

/// The current calendar date in the server's local time zone. Menus and deliveries are keyed by this date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Local midnight at the start of `date`, as a UTC timestamp.
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    midnight
        .and_local_timezone(Local)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| midnight.and_utc())
}
