//! Untitled articles are dropped with a single warning while the rest of
//! the stream is still converted. Also checks the log volume of an
//! abbreviation table rebuild.
//!
//! This file holds one test only: it installs a process-wide logger.

use log::{Level, LevelFilter, Log, Metadata};
use std::sync::Mutex;
use xdxf_reader::{ConvertOptions, Record, XdxfReader};

struct CapturingLogger {
    records: Mutex<Vec<(Level, String)>>,
}

impl Log for CapturingLogger {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        if record.target().starts_with("xdxf_reader") {
            self.records
                .lock()
                .expect("logger lock")
                .push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static LOGGER: CapturingLogger = CapturingLogger {
    records: Mutex::new(Vec::new()),
};

#[test]
fn untitled_article_is_skipped_with_one_warning() {
    log::set_logger(&LOGGER).expect("install logger");
    log::set_max_level(LevelFilter::Trace);

    let xml = concat!(
        "<xdxf>",
        "<abbreviations><abr_def><k>n.</k><v>noun</v></abr_def></abbreviations>",
        "<ar><k>before</k> first</ar>",
        "<ar><def>no title here</def></ar>",
        "<ar><k>after</k> last</ar>",
        "</xdxf>",
    );
    let mut reader = XdxfReader::new(xml.as_bytes(), ConvertOptions::default());
    let keys: Vec<String> = reader
        .by_ref()
        .map(|r| r.expect("record ok"))
        .filter_map(|r| match r {
            Record::Content(c) => Some(c.keys),
            Record::Tag(_) => None,
        })
        .flatten()
        .collect();

    assert_eq!(keys, vec!["before".to_string(), "after".to_string()]);
    assert_eq!(reader.skipped_articles(), 1);
    assert_eq!(reader.articles(), 2);

    let records = LOGGER.records.lock().expect("logger lock").clone();
    let table_messages = records
        .iter()
        .filter(|(_, message)| message.contains("abbreviation table"))
        .count();
    assert_eq!(table_messages, 1, "log: {:?}", records);

    let warnings: Vec<String> = records
        .iter()
        .filter(|(level, _)| *level == Level::Warn)
        .map(|(_, message)| message.clone())
        .collect();
    assert_eq!(warnings.len(), 1, "warnings: {:?}", warnings);
    assert!(warnings[0].starts_with("No title found in article:"));
    assert!(
        warnings[0].contains("<ar><def>no title here</def></ar>"),
        "{}",
        warnings[0]
    );
}
