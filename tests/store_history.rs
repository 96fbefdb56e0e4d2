use pricewatch::formats::{Availability, HistoryRow, Observation};
use pricewatch::store;

fn observation(price: Option<f64>) -> Observation {
    let mut observation = Observation::begin("https://example.com/item", 21.00, "78726");
    if let Some(price) = price {
        observation.price = Some(price);
        observation.availability = Availability::Available;
        observation.success = true;
        observation.below_target = price < observation.target_price;
    }
    observation
}

#[test]
fn history_has_one_header_and_one_row_per_run() {
    let dir = tempfile::tempdir().expect("create temp dir");

    for price in [Some(18.99), Some(23.50), None] {
        store::append_history(dir.path(), &observation(price)).expect("append history");
    }

    let path = dir.path().join("price_history.csv");
    let contents = std::fs::read_to_string(&path).expect("read price history");
    let lines: Vec<&str> = contents.lines().collect();

    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines[0],
        "timestamp,date,time,price,availability,below_target,product_title,email_sent"
    );
    // A failed run serializes with an empty price field.
    assert!(lines[3].contains(",,Unknown,false,"), "unexpected row: {}", lines[3]);
}

#[test]
fn existing_history_gets_rows_but_no_second_header() {
    let dir = tempfile::tempdir().expect("create temp dir");

    store::append_history(dir.path(), &observation(Some(18.99))).expect("append history");
    store::append_history(dir.path(), &observation(Some(19.99))).expect("append history");

    let contents = std::fs::read_to_string(dir.path().join("price_history.csv"))
        .expect("read price history");
    let headers = contents
        .lines()
        .filter(|line| line.starts_with("timestamp,"))
        .count();
    assert_eq!(headers, 1);
}

#[test]
fn history_rows_round_trip_through_the_csv_reader() {
    let dir = tempfile::tempdir().expect("create temp dir");

    store::append_history(dir.path(), &observation(Some(18.99))).expect("append history");

    let mut reader =
        csv::Reader::from_path(dir.path().join("price_history.csv")).expect("open price history");
    let rows: Vec<HistoryRow> = reader
        .deserialize()
        .collect::<Result<_, _>>()
        .expect("parse history rows");

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].price, Some(18.99));
    assert_eq!(rows[0].availability, Availability::Available);
    assert!(rows[0].below_target);
}

#[test]
fn snapshot_serializes_the_full_observation() {
    let dir = tempfile::tempdir().expect("create temp dir");

    let path = store::write_snapshot(dir.path(), &observation(Some(18.99)))
        .expect("write snapshot");
    let json = std::fs::read_to_string(&path).expect("read snapshot");
    let parsed: Observation = serde_json::from_str(&json).expect("parse snapshot");

    assert_eq!(parsed.price, Some(18.99));
    assert_eq!(parsed.zip_code, "78726");
    assert!(parsed.below_target);
    assert_eq!(parsed.error_message, None);
}
