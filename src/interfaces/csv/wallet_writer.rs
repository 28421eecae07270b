use crate::domain::wallet::Wallet;
use crate::error::Result;
use std::io::Write;

/// Writes final wallet states as CSV.
///
/// Emits `id,owner,name,balance`; the wallet number and timestamps are
/// omitted so output is stable across runs.
pub struct WalletWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> WalletWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_wallets(&mut self, wallets: Vec<Wallet>) -> Result<()> {
        self.writer.write_record(["id", "owner", "name", "balance"])?;
        for wallet in wallets {
            self.writer.write_record([
                wallet.id.to_string(),
                wallet.owner.to_string(),
                wallet.name,
                wallet.balance.to_string(),
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_writer_output_shape() {
        let mut wallet = Wallet::new(1, 7, "savings".into());
        wallet.apply_delta(dec!(12.50)).unwrap();

        let mut buf = Vec::new();
        let mut writer = WalletWriter::new(&mut buf);
        writer.write_wallets(vec![wallet]).unwrap();
        drop(writer);

        let output = String::from_utf8(buf).unwrap();
        assert!(output.starts_with("id,owner,name,balance\n"));
        assert!(output.contains("1,7,savings,12.50"));
    }
}
