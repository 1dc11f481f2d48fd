use std::collections::HashMap;

use bindarg::{impl_complex, BindingParser, Record};

#[derive(Debug, Clone)]
struct Endpoint {
    host: String,
    port: u16,
}

impl_complex!(Endpoint);

fn endpoint(raw: &str) -> Result<Endpoint, String> {
    let (host, port) = raw
        .rsplit_once(':')
        .ok_or_else(|| format!("'{raw}' is not HOST:PORT"))?;
    let port = port
        .parse()
        .map_err(|error| format!("bad port '{port}': {error}"))?;

    Ok(Endpoint {
        host: host.to_string(),
        port,
    })
}

#[derive(Debug, Record)]
#[binding(name = "client")]
struct Client {
    #[binding(parse = endpoint, help = "The server, as HOST:PORT.")]
    server: Endpoint,
    #[binding(literal = [1, 3, 5], default = 3, help = "Attempts before giving up.")]
    retries: i64,
    #[binding(default, help = "Extra request headers.")]
    headers: HashMap<String, String>,
    #[binding(choices = ["1.0", "1.1"], default_str = "1.1")]
    protocol: f64,
    #[binding(skip)]
    attempts: usize,
}

fn main() {
    let (client,) = BindingParser::for_records::<(Client,)>("client").parse::<(Client,)>();
    println!(
        "connecting to {}:{} (HTTP/{}), {} retries, {} attempts so far",
        client.server.host, client.server.port, client.protocol, client.retries, client.attempts
    );

    for (name, value) in &client.headers {
        println!("{name}: {value}");
    }
}
