/*!

Plain projections of a finished run for charting or export: the S/I/R time series and each
person's infection timing as CSV, and the event log as JSON lines. Nothing here is read back.

*/

use crate::{
    error::HandshakeError,
    event::Event,
    people::Population,
    simulation::{SimulationOutput, SirCounts},
};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const TIME_SERIES_FILE: &str = "time_series.csv";
pub const INFECTION_TIMES_FILE: &str = "infection_times.csv";
pub const EVENTS_FILE: &str = "events.jsonl";

#[derive(Serialize)]
struct TimeSeriesRow {
    t: usize,
    susceptible: usize,
    infectious: usize,
    removed: usize,
}

#[derive(Serialize)]
struct InfectionTimeRow<'a> {
    id: usize,
    name: &'a str,
    compartment: char,
    initial_infection_time: Option<usize>,
}

pub fn write_time_series_csv<W: Write>(
    writer: W,
    time_series: &[SirCounts],
) -> Result<(), HandshakeError> {
    let mut writer = csv::Writer::from_writer(writer);
    for (t, counts) in time_series.iter().enumerate() {
        writer.serialize(TimeSeriesRow {
            t,
            susceptible: counts.s,
            infectious: counts.i,
            removed: counts.r,
        })?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_infection_times_csv<W: Write>(
    writer: W,
    population: &Population,
) -> Result<(), HandshakeError> {
    let mut writer = csv::Writer::from_writer(writer);
    for person in population.iter() {
        writer.serialize(InfectionTimeRow {
            id: person.id.index(),
            name: &person.name,
            compartment: person.compartment.letter(),
            initial_infection_time: person.initial_infection_time,
        })?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_events_jsonl<W: Write>(mut writer: W, events: &[Event]) -> Result<(), HandshakeError> {
    for event in events {
        serde_json::to_writer(&mut writer, event)?;
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes all three reports into `dir`, creating it if needed.
pub fn write_reports(dir: impl AsRef<Path>, output: &SimulationOutput) -> Result<(), HandshakeError> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    write_time_series_csv(
        BufWriter::new(File::create(dir.join(TIME_SERIES_FILE))?),
        &output.time_series,
    )?;
    write_infection_times_csv(
        BufWriter::new(File::create(dir.join(INFECTION_TIMES_FILE))?),
        &output.population,
    )?;
    write_events_jsonl(
        BufWriter::new(File::create(dir.join(EVENTS_FILE))?),
        &output.events,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{simulation::simulate, PersonId};

    fn line_output() -> SimulationOutput {
        let mut population = Population::with_size(3, |idx| format!("P{idx}"));
        population.add_contact(PersonId(0), PersonId(1));
        population.add_contact(PersonId(1), PersonId(2));
        simulate(population, 5, &[PersonId(0)], &[])
    }

    #[test]
    fn time_series_csv() {
        let mut buffer = Vec::new();
        write_time_series_csv(&mut buffer, &line_output().time_series).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(
            text,
            "t,susceptible,infectious,removed\n0,2,1,0\n1,1,2,0\n2,0,2,1\n3,0,0,3\n"
        );
    }

    #[test]
    fn infection_times_csv_leaves_missing_times_empty() {
        let mut population = Population::with_size(2, |idx| format!("P{idx}"));
        population.add_contact(PersonId(0), PersonId(1));
        let output = simulate(population, 0, &[PersonId(0)], &[]);

        let mut buffer = Vec::new();
        write_infection_times_csv(&mut buffer, &output.population).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(
            text,
            "id,name,compartment,initial_infection_time\n0,P0,R,0\n1,P1,S,\n"
        );
    }

    #[test]
    fn events_are_one_json_object_per_line() {
        let output = line_output();
        let mut buffer = Vec::new();
        write_events_jsonl(&mut buffer, &output.events).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), output.events.len());
        let first: Event = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first, output.events[0]);
    }

    #[test]
    fn writes_all_reports_to_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("output");
        write_reports(&target, &line_output()).unwrap();
        for file in [TIME_SERIES_FILE, INFECTION_TIMES_FILE, EVENTS_FILE] {
            let contents = std::fs::read_to_string(target.join(file)).unwrap();
            assert!(!contents.is_empty(), "{file} is empty");
        }
    }
}
