use logsub_cli::{command, init_tracing, schema, synth, SynthArgs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let matches = command().get_matches();

    match matches.subcommand() {
        Some(("synth", args)) => {
            let args = SynthArgs::from_matches(args);
            let (rendered, _report) = synth(&args).await?;
            println!("{rendered}");
        }
        Some(("schema", _)) => {
            println!("{}", schema()?);
        }
        _ => unreachable!("subcommand is required"),
    }

    Ok(())
}
