use crate::config::ReplayOptions;
use crate::http_request_executor::{dump_response, print_status, TransportSession};
use crate::raw_request_parser::read_raw_request;
use crate::request_builder::{build_request, write_raw_request};
use crate::substitution::Substitutions;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};

pub fn replay(options: &ReplayOptions) -> Result<()> {
    let session = TransportSession::new(options.proxy.as_deref())?;
    let stdout = std::io::stdout();
    replay_with(&session, options, &mut stdout.lock())
}

pub fn replay_with<W: Write>(session: &TransportSession, options: &ReplayOptions, out: &mut W) -> Result<()> {
    let p = &options.file;
    let subs = Substitutions::new(&options.substitutions)?;
    let conf = read_raw_request(p, options.scheme, &subs).context(format!("while parsing file {}", p.display()))?;
    let request = build_request(&conf).context(format!("while building request from {}", p.display()))?;

    if let Some(path) = &options.save_request {
        let file = File::create(path).context(format!("could not create {}", path.display()))?;
        write_raw_request(&request, &mut BufWriter::new(file)).context(format!("could not write {}", path.display()))?;
    }

    let response = session.execute(request)?;
    if options.dump_response {
        dump_response(response, out)?;
    } else {
        print_status(&response, out)?;
    }
    return Ok(());
}
