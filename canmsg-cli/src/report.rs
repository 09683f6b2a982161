//! Text rendering of message files
//!
//! Overview and detail views of loaded files, plus the simulation table.
//! The detail view annotates every net field with the point indices it
//! references and every point with the fields referencing it - the text
//! rendition of hover-highlighting. Unresolved references are listed,
//! never fatal.

use anyhow::Result;
use canmsg_model::{sim, CanFile, CanMessage, CanPoint, CrossRefIndex, Sweeper};
use rand::Rng;
use std::fmt::Write;

/// One-line-per-message listing of every loaded file
pub fn overview(files: &[CanFile]) -> String {
    let mut out = String::new();
    for file in files {
        let dirty = if file.is_dirty { " *" } else { "" };
        let _ = writeln!(
            out,
            "{}{} ({} messages)",
            file.filename,
            dirty,
            file.content.len()
        );
        for msg in &file.content {
            let key = msg.key.as_deref().unwrap_or("-");
            let freq = msg
                .sim_freq
                .map(|f| format!("{}Hz", f))
                .unwrap_or_else(|| "-".to_string());
            let _ = writeln!(
                out,
                "  {:<12} {:<40} key={} sim_freq={} points={} fields={}",
                msg.id,
                msg.desc,
                key,
                freq,
                msg.points.len(),
                msg.fields.len()
            );
        }
    }
    out
}

/// Full view of one message: points, fields and their cross-references
pub fn detail(msg: &CanMessage) -> String {
    let index = CrossRefIndex::build(msg);
    let mut out = String::new();

    let _ = writeln!(out, "ID: {}", msg.id);
    let _ = writeln!(out, "Description: {}", msg.desc);
    if let Some(key) = &msg.key {
        let _ = writeln!(out, "Key: {}", key);
    }
    if let Some(freq) = msg.sim_freq {
        let _ = writeln!(out, "Simulation Frequency: {}Hz", freq);
    }
    if msg.is_extended() {
        let _ = writeln!(out, "Extended (29-bit) identifier");
    }

    let _ = writeln!(out, "\nNet Fields:");
    for field in &msg.fields {
        let refs: Vec<String> = index
            .point_indices_for_field(&field.name)
            .into_iter()
            .map(|i| i.to_string())
            .collect();
        let unit = if field.unit.is_empty() {
            String::new()
        } else {
            format!(" [{}]", field.unit)
        };
        let _ = writeln!(
            out,
            "  {}{} -> points {{{}}}",
            field.name,
            unit,
            refs.join(", ")
        );
    }

    let _ = writeln!(out, "\nCAN Points:");
    for (i, point) in msg.points.iter().enumerate() {
        let names: Vec<String> = index.fields_referencing_point(i + 1).into_iter().collect();
        let _ = writeln!(
            out,
            "  {}. {} <- {}",
            i + 1,
            describe_point(point),
            if names.is_empty() {
                "(unreferenced)".to_string()
            } else {
                names.join(", ")
            }
        );
    }

    let unresolved = index.unresolved_references();
    if !unresolved.is_empty() {
        let _ = writeln!(out, "\nUnresolved references:");
        for (name, idx) in unresolved {
            let _ = writeln!(out, "  {} -> point {} (out of range)", name, idx);
        }
    }

    out
}

/// Tag-style point summary, e.g. "32bit signed little divide10000"
fn describe_point(point: &CanPoint) -> String {
    let mut tags = vec![format!("{}bit", point.size)];
    if point.is_float() {
        tags.push("ieee754_f32".to_string());
    }
    if point.is_signed() {
        tags.push("signed".to_string());
    }
    if let Some(e) = point.endianness {
        tags.push(e.to_string());
    }
    if let Some(format) = &point.format {
        tags.push(format.clone());
    }
    if let Some(default) = point.default {
        tags.push(format!("default={}", default));
    }
    if let Some(descriptor) = &point.sim {
        if descriptor.is_enumerated() {
            tags.push("sim=enum".to_string());
        } else {
            tags.push("sim=sweep".to_string());
        }
    }
    tags.join(" ")
}

/// Render `rounds` simulated samples for every point of every message
/// that carries a sim descriptor
pub fn sample_table<R: Rng>(file: &CanFile, rounds: usize, rng: &mut R) -> Result<String> {
    let mut out = String::new();

    for msg in &file.content {
        let mut sweepers: Vec<Option<Sweeper>> = Vec::with_capacity(msg.points.len());
        for point in &msg.points {
            let sweeper = match &point.sim {
                Some(descriptor) if !descriptor.is_enumerated() => {
                    Some(Sweeper::new(descriptor, point.default)?)
                }
                _ => None,
            };
            sweepers.push(sweeper);
        }
        if msg.points.iter().all(|p| p.sim.is_none()) {
            continue;
        }

        let _ = writeln!(out, "{} ({})", msg.id, msg.desc);
        for round in 1..=rounds {
            let mut cells = Vec::with_capacity(msg.points.len());
            for (point, sweeper) in msg.points.iter().zip(sweepers.iter_mut()) {
                let cell = match (&point.sim, sweeper) {
                    (Some(_), Some(sw)) => format!("{:.3}", sw.step(rng)),
                    (Some(descriptor), None) => format!("{:.3}", sim::sample(descriptor, rng)?),
                    (None, _) => point
                        .default
                        .map(|d| format!("{:.3}*", d))
                        .unwrap_or_else(|| "-".to_string()),
                };
                cells.push(cell);
            }
            let _ = writeln!(out, "  step {:>3}: {}", round, cells.join("  "));
        }
    }

    if out.is_empty() {
        out.push_str("no sim descriptors in loaded messages\n");
    }
    Ok(out)
}
