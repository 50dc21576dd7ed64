// src/config/validate.rs

use anyhow::{anyhow, Result};

use crate::config::model::Config;

/// Run basic semantic validation against a loaded configuration.
///
/// This checks:
/// - `workflow.start-time < workflow.end-time`
/// - there is at least one instrument
/// - `min-segment-length` is not negative
/// - every role in `stage-order` has an `[executable.<role>]` section
/// - all `[site.*]` segment pairs are well-formed (`start < end`)
/// - site frame templates refer to known instruments
///
/// It does **not** verify that executables exist on disk, or that mandatory
/// options are present for each role — the latter is the job descriptor's
/// fail-fast responsibility, since only the stage code knows which options
/// its executable requires.
pub fn validate_config(cfg: &Config) -> Result<()> {
    validate_workflow_section(cfg)?;
    validate_stage_roles(cfg)?;
    validate_sites(cfg)?;
    Ok(())
}

fn validate_workflow_section(cfg: &Config) -> Result<()> {
    let wf = &cfg.workflow;

    if wf.start_time >= wf.end_time {
        return Err(anyhow!(
            "[workflow] start-time ({}) must be before end-time ({})",
            wf.start_time,
            wf.end_time
        ));
    }

    if wf.instruments.is_empty() {
        return Err(anyhow!(
            "[workflow] must name at least one instrument"
        ));
    }

    if wf.min_segment_length < 0 {
        return Err(anyhow!(
            "[workflow] min-segment-length must not be negative (got {})",
            wf.min_segment_length
        ));
    }

    Ok(())
}

fn validate_stage_roles(cfg: &Config) -> Result<()> {
    for role in cfg.workflow.stage_order.iter() {
        if !cfg.executable.contains_key(role) {
            return Err(anyhow!(
                "stage-order names role '{}' but there is no [executable.{}] section",
                role,
                role
            ));
        }
    }
    Ok(())
}

fn validate_sites(cfg: &Config) -> Result<()> {
    for (site_name, site) in cfg.site.iter() {
        for (instrument, pairs) in site.segments.iter() {
            for (start, end) in pairs.iter() {
                if start >= end {
                    return Err(anyhow!(
                        "[site.{}.segments] {} has malformed pair [{}, {}]",
                        site_name,
                        instrument,
                        start,
                        end
                    ));
                }
            }
        }
        for instrument in site.frames.keys() {
            if !cfg.workflow.instruments.contains(instrument) {
                return Err(anyhow!(
                    "[site.{}.frames] refers to instrument '{}' not listed in [workflow] instruments",
                    site_name,
                    instrument
                ));
            }
        }
    }
    Ok(())
}
