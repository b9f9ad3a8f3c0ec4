//! Script and witness builders
//!
//! Builders return raw witness stack items; the item-count prefix is
//! written only by the transaction serializer.

use super::types::{BtcSignature, ScriptType, TxInput};
use crate::error::{TxError, TxResult};

const OP_0: u8 = 0x00;
const OP_PUSHDATA1: u8 = 0x4c;
const OP_PUSHDATA2: u8 = 0x4d;
const OP_PUSHDATA4: u8 = 0x4e;
const OP_DUP: u8 = 0x76;
const OP_HASH160: u8 = 0xa9;
const OP_EQUALVERIFY: u8 = 0x88;
const OP_CHECKSIG: u8 = 0xac;

/// Append a data push using the shortest push opcode for its length
pub fn push_data(data: &[u8], script: &mut Vec<u8>) {
    let len = data.len();
    if len < OP_PUSHDATA1 as usize {
        script.push(len as u8);
    } else if len <= 0xff {
        script.push(OP_PUSHDATA1);
        script.push(len as u8);
    } else if len <= 0xffff {
        script.push(OP_PUSHDATA2);
        script.extend_from_slice(&(len as u16).to_le_bytes());
    } else {
        script.push(OP_PUSHDATA4);
        script.extend_from_slice(&(len as u32).to_le_bytes());
    }
    script.extend_from_slice(data);
}

/// `OP_DUP OP_HASH160 <20> OP_EQUALVERIFY OP_CHECKSIG`
///
/// Also the BIP143 scriptCode of a P2WPKH input.
pub fn p2pkh_script(pubkey_hash: &[u8; 20]) -> Vec<u8> {
    let mut script = Vec::with_capacity(25);
    script.push(OP_DUP);
    script.push(OP_HASH160);
    push_data(pubkey_hash, &mut script);
    script.push(OP_EQUALVERIFY);
    script.push(OP_CHECKSIG);
    script
}

/// `OP_0 <20-byte key hash>`
pub fn p2wpkh_script(pubkey_hash: &[u8; 20]) -> Vec<u8> {
    let mut script = Vec::with_capacity(22);
    script.push(OP_0);
    push_data(pubkey_hash, &mut script);
    script
}

/// Unlocking data for one input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputAuthorization {
    pub script_sig: Vec<u8>,
    /// Raw stack items, no count prefix
    pub witness: Vec<Vec<u8>>,
}

/// Build the scriptSig and witness stack that spend `input`
pub fn authorize_input(
    input: &TxInput,
    sig: &BtcSignature,
    pubkey: &[u8],
) -> TxResult<InputAuthorization> {
    if pubkey.len() != 33 && pubkey.len() != 65 {
        return Err(TxError::malformed(format!(
            "public key must be 33 or 65 bytes, got {}",
            pubkey.len()
        )));
    }
    let sig_bytes = sig.to_script_bytes();

    match input.script_type {
        ScriptType::P2PKH => {
            // <sig> <pubkey>
            let mut script_sig = Vec::with_capacity(sig_bytes.len() + pubkey.len() + 2);
            push_data(&sig_bytes, &mut script_sig);
            push_data(pubkey, &mut script_sig);
            Ok(InputAuthorization {
                script_sig,
                witness: Vec::new(),
            })
        }
        ScriptType::P2SH => {
            // <sig> <pubkey> <redeemScript>
            if input.redeem_script.is_empty() {
                return Err(TxError::malformed("P2SH input requires a redeem script"));
            }
            let mut script_sig = Vec::new();
            push_data(&sig_bytes, &mut script_sig);
            push_data(pubkey, &mut script_sig);
            push_data(&input.redeem_script, &mut script_sig);
            Ok(InputAuthorization {
                script_sig,
                witness: Vec::new(),
            })
        }
        ScriptType::P2WPKH => Ok(InputAuthorization {
            script_sig: Vec::new(),
            witness: vec![sig_bytes, pubkey.to_vec()],
        }),
        ScriptType::P2WSH => {
            let mut witness = vec![sig_bytes, pubkey.to_vec()];
            if !input.redeem_script.is_empty() {
                witness.push(input.redeem_script.clone());
            }
            Ok(InputAuthorization {
                script_sig: Vec::new(),
                witness,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::btc::types::SigHashType;

    fn sample_sig() -> BtcSignature {
        BtcSignature {
            r: [0x11; 32],
            s: [0x22; 32],
            hash_type: SigHashType::All,
        }
    }

    fn sample_pubkey() -> Vec<u8> {
        let mut pk = vec![0x02];
        pk.extend_from_slice(&[0x33; 32]);
        pk
    }

    #[test]
    fn test_push_data_opcodes() {
        let mut s = Vec::new();
        push_data(&[0xaa; 75], &mut s);
        assert_eq!(s[0], 75);

        let mut s = Vec::new();
        push_data(&[0xaa; 76], &mut s);
        assert_eq!(&s[..2], &[OP_PUSHDATA1, 76]);

        let mut s = Vec::new();
        push_data(&[0xaa; 256], &mut s);
        assert_eq!(&s[..3], &[OP_PUSHDATA2, 0x00, 0x01]);
        assert_eq!(s.len(), 259);
    }

    #[test]
    fn test_standard_scripts() {
        let hash = [0xab; 20];
        assert_eq!(
            hex::encode(p2pkh_script(&hash)),
            format!("76a914{}88ac", "ab".repeat(20))
        );
        assert_eq!(
            hex::encode(p2wpkh_script(&hash)),
            format!("0014{}", "ab".repeat(20))
        );
    }

    #[test]
    fn test_p2pkh_authorization() {
        let input = TxInput::new([0; 32], 0, 0xffffffff, ScriptType::P2PKH);
        let auth = authorize_input(&input, &sample_sig(), &sample_pubkey()).unwrap();
        assert!(auth.witness.is_empty());
        assert_eq!(auth.script_sig.len(), 1 + 71 + 1 + 33);
        assert_eq!(auth.script_sig[0], 71);
        assert_eq!(auth.script_sig[72], 33);
    }

    #[test]
    fn test_p2wpkh_witness_has_no_count_prefix() {
        let input = TxInput::new([0; 32], 0, 0xffffffff, ScriptType::P2WPKH);
        let auth = authorize_input(&input, &sample_sig(), &sample_pubkey()).unwrap();
        assert!(auth.script_sig.is_empty());
        assert_eq!(auth.witness.len(), 2);
        assert_eq!(auth.witness[0][0], 0x30);
        assert_eq!(auth.witness[1], sample_pubkey());
    }

    #[test]
    fn test_p2wsh_appends_witness_script() {
        let input = TxInput::new([0; 32], 0, 0xffffffff, ScriptType::P2WSH)
            .with_redeem_script(vec![0x51]);
        let auth = authorize_input(&input, &sample_sig(), &sample_pubkey()).unwrap();
        assert_eq!(auth.witness.len(), 3);
        assert_eq!(auth.witness[2], vec![0x51]);
    }

    #[test]
    fn test_p2sh_requires_redeem_script() {
        let input = TxInput::new([0; 32], 0, 0xffffffff, ScriptType::P2SH);
        assert!(matches!(
            authorize_input(&input, &sample_sig(), &sample_pubkey()),
            Err(TxError::MalformedInput(_))
        ));

        let input = input.with_redeem_script(vec![0x51, 0x52]);
        let auth = authorize_input(&input, &sample_sig(), &sample_pubkey()).unwrap();
        assert!(auth.script_sig.ends_with(&[0x02, 0x51, 0x52]));
    }

    #[test]
    fn test_rejects_bad_pubkey_length() {
        let input = TxInput::new([0; 32], 0, 0xffffffff, ScriptType::P2PKH);
        assert!(authorize_input(&input, &sample_sig(), &[0x02; 20]).is_err());
    }
}
