use bitvec::prelude::*;
use huffcode::{HuffmanTree, ProbabilityTable, UnknownSymbolPolicy};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;

/// Encoded data packed together with the probabilities needed to rebuild its
/// tree.
#[derive(Serialize, Deserialize)]
struct HuffmanSerialized {
    data: Box<[usize]>,
    bit_len: usize,
    probabilities: ProbabilityTable,
}

impl HuffmanSerialized {
    fn new(bv: BitVec, probabilities: ProbabilityTable) -> Self {
        let bl = bv.len();

        Self {
            data: bv.into_boxed_bitslice().into_boxed_slice(),
            bit_len: bl,
            probabilities,
        }
    }

    fn into_parts(self) -> (BitVec, ProbabilityTable) {
        let Self {
            data,
            bit_len,
            probabilities,
        } = self;

        let mut bv = BitBox::from_boxed_slice(data).into_bitvec();
        bv.resize(bit_len, false);

        (bv, probabilities)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let fp = env::args()
        .nth(1)
        .ok_or("Please provide path to input file as first argument.")?;

    let input_bytes = fs::read(fp)?;

    // encode scope - save to file
    {
        let probabilities =
            ProbabilityTable::from_sample(&input_bytes[..], 256, UnknownSymbolPolicy::Fail)?;
        let (e, _) = probabilities.to_tree()?.into_encoder_decoder_pair();

        let encoded = e.encode(input_bytes.iter().copied())?;
        let packed = HuffmanSerialized::new(encoded, probabilities);
        let data = rmp_serde::to_vec(&packed)?;

        fs::write("encoded.mp", data)?;
    }

    // decode scope - read from file
    {
        let file_data = fs::read("encoded.mp")?;

        let packed: HuffmanSerialized = rmp_serde::from_slice(&file_data)?;
        let (enc, probabilities) = packed.into_parts();
        let tree: HuffmanTree<u8> = probabilities.to_tree()?;
        let (_, d) = tree.into_encoder_decoder_pair();
        let decoded = d.decode(&enc);

        assert_eq!(decoded, input_bytes);
        fs::write("decoded.txt", decoded)?;
    }

    Ok(())
}
