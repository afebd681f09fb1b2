use huffcode::{to_ascii, HuffmanTree};

fn main() -> huffcode::Result<()> {
    let s = String::from("Hello my name is Sam!");
    let tree = HuffmanTree::from_samples(s.bytes())?;
    let (e, d) = tree.into_encoder_decoder_pair();

    let out = e.encode(s.bytes())?;
    println!("{} bits: {}", out.len(), to_ascii(&out));

    let dec = String::from_utf8(d.decode(&out));
    println!("{:?}", dec);

    Ok(())
}
