//! Subcommand entry points: translate parsed arguments into pipeline calls.

use anyhow::Result;

use ahcah_cli::pipeline;
use ahcah_cli::types::{CleanResult, RedactResult, RunResult, StandardizeResult};
use ahcah_core::standardize::{DateMode, StandardizeOptions};
use ahcah_model::SchemaProfile;
use ahcah_tables::DataLayout;

use crate::cli::{CleanArgs, ProfileArg, RedactArgs, RunArgs, StandardizeArgs};

pub fn run_redact(args: &RedactArgs) -> Result<RedactResult> {
    let layout = DataLayout::new(&args.data_dir);
    pipeline::redact(&layout, args.dry_run)
}

pub fn run_standardize(args: &StandardizeArgs) -> Result<StandardizeResult> {
    let layout = DataLayout::new(&args.data_dir);
    let options = standardize_options(args.profile, args.lenient_dates);
    pipeline::standardize(&layout, &options, args.dry_run)
}

pub fn run_clean(args: &CleanArgs) -> Result<CleanResult> {
    let layout = DataLayout::new(&args.data_dir);
    pipeline::clean(&layout, args.dry_run)
}

pub fn run_all(args: &RunArgs) -> Result<RunResult> {
    let layout = DataLayout::new(&args.data_dir);
    let options = standardize_options(args.profile, args.lenient_dates);
    pipeline::run(&layout, &options, args.dry_run)
}

fn standardize_options(profile: ProfileArg, lenient_dates: bool) -> StandardizeOptions {
    StandardizeOptions {
        profile: match profile {
            ProfileArg::Legacy => SchemaProfile::Legacy,
            ProfileArg::Current => SchemaProfile::Current,
        },
        date_mode: if lenient_dates {
            DateMode::Lenient
        } else {
            DateMode::Strict
        },
    }
}
