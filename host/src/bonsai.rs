//! STARK to Groth16 conversion on Bonsai, for receipts proven without `--groth16`.

use std::{thread, time::Duration};

use bonsai_sdk::blocking::Client;
use risc0_zkvm::Receipt;
use tracing::{info, warn};

use crate::error::{HostError, Result};

const POLL_INTERVAL: Duration = Duration::from_secs(15);

/// Uploads a succinct receipt and waits for Bonsai to wrap it in Groth16.
///
/// Needs `BONSAI_API_URL` and `BONSAI_API_KEY`.
pub fn stark_to_snark(stark: &Receipt, max_retries: usize) -> Result<Receipt> {
    info!("Submitting SNARK workload");
    let client = Client::from_env(risc0_zkvm::VERSION)?;
    let stark_uuid = client.upload_receipt(bincode::serialize(stark)?)?;
    let snark_id = client.create_snark(stark_uuid.clone())?;

    let mut retry = 0;
    let snark = loop {
        let res = snark_id.status(&client)?;
        match res.status.as_str() {
            "RUNNING" => {
                info!("{stark_uuid}: {} - continue polling...", res.status);
                thread::sleep(POLL_INTERVAL);
            }
            "SUCCEEDED" => {
                let url = res
                    .output
                    .ok_or_else(|| HostError::Remote("response is missing the receipt".into()))?;
                break bincode::deserialize::<Receipt>(&client.download(&url)?)?;
            }
            status => {
                let err = res.error_msg.unwrap_or_default();
                if retry >= max_retries {
                    return Err(HostError::Remote(format!("{status}: {err}")));
                }
                retry += 1;
                warn!("{stark_uuid} exited: {status} - {err} - retrying {retry}/{max_retries}");
                thread::sleep(POLL_INTERVAL);
            }
        }
    };

    if snark.journal.bytes != stark.journal.bytes {
        return Err(HostError::Remote("SNARK journal differs from the STARK journal".into()));
    }
    info!("SNARK receipt ready");
    Ok(snark)
}
