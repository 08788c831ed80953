//! `pfsight query`: one tool-style request, one envelope.

use pfsight_api::Query;
use pfsight_config::Settings;
use tracing::debug;

use crate::cli::{GlobalOpts, OutputFormat, QueryArgs};
use crate::error::CliError;
use crate::output;

pub async fn handle(args: &QueryArgs, settings: &Settings, global: &GlobalOpts) -> Result<(), CliError> {
    let query = build_query(args)?;
    let client = super::build_client(settings, global)?;

    debug!(operation = %query.operation, endpoint = %query.endpoint, "running query");
    let result = client.execute(&query).await;

    let color = output::should_color(global.color);
    if result.is_success() {
        output::print_output(
            &output::render_envelope(global.output, &result, color),
            global.quiet,
        );
        return Ok(());
    }

    // The envelope is the contract; show it in JSON modes even on failure.
    if global.output != OutputFormat::Plain {
        output::print_output(
            &output::render_envelope(global.output, &result, color),
            global.quiet,
        );
    }
    Err(CliError::RequestFailed {
        message: result.error().unwrap_or("request failed").to_owned(),
    })
}

fn build_query(args: &QueryArgs) -> Result<Query, CliError> {
    let mut query = Query::new(args.operation, &args.endpoint)
        .with_filters(args.filters.iter().cloned().collect());

    if let Some(ref field) = args.sort_by {
        query = query.with_sort_by(field);
    }
    if let Some(ref flags) = args.sort_flags {
        query = query.with_sort_flags(flags);
    }
    if let Some(order) = args.sort_order {
        query = query.with_sort_order(order);
    }
    if let Some(ref data) = args.data {
        query = query.with_body(serde_json::from_str(data)?);
    }
    Ok(query)
}
