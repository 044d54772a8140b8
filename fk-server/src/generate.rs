use fk_core::keys::{generate_pair, FormKey};
use rand::RngCore;

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

use crate::config::read_server_key;
use crate::opts::*;
use crate::ServerError;

/// Size of freshly generated process-wide keys.
const GENERATED_KEY_SIZE: usize = 32;

fn write_owned<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> std::io::Result<()> {
    let mut opts = OpenOptions::new();
    opts.write(true).create_new(true);

    #[cfg(unix)]
    opts.mode(0o600);

    opts.open(path)?.write_all(contents.as_ref())
}

/// Writes a fresh server key and token key. Existing files are never overwritten.
pub fn exec(gen_opts: &GenOpts) -> Result<(), ServerError> {
    let mut rng = rand::thread_rng();

    let GenOpts {
        server_key_path,
        token_key_path,
    } = gen_opts;

    let mut server_key = [0u8; GENERATED_KEY_SIZE];
    let mut token_key = [0u8; GENERATED_KEY_SIZE];
    rng.fill_bytes(&mut server_key);
    rng.fill_bytes(&mut token_key);

    for path in [server_key_path, token_key_path] {
        if Path::new(path).exists() {
            return Err(ServerError::StdIO(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                format!("{path} already exists"),
            )));
        }
    }

    write_owned(server_key_path, server_key)?;
    if let Err(e) = write_owned(token_key_path, token_key) {
        // Never leave one key without the other.
        let _ = std::fs::remove_file(server_key_path);
        return Err(e.into());
    }

    println!("The following keys were written:\n{server_key_path}\n{token_key_path}");

    Ok(())
}

/// Prints a new secret and its form key, for owners provisioning forms offline.
pub fn form(form_opts: &FormOpts) -> Result<(), ServerError> {
    let (secret, form_key) = new_form(&form_opts.server_key_path)?;

    println!("secret:   {secret}\nform key: {form_key}");

    Ok(())
}

fn new_form(server_key_path: impl AsRef<Path>) -> Result<(String, FormKey), ServerError> {
    let server_key = read_server_key(server_key_path)?;
    let (secret, form_key) = generate_pair(&server_key, &mut rand::thread_rng());

    Ok((secret.encode(), form_key))
}
