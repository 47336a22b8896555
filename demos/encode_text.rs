use huffpack::{render_bits, CodeTable, Decoder, Encoder, FrequencyModel, HuffmanTree};

fn main() -> huffpack::Result<()> {
    let s = String::from("Hello my name is Sam!");
    let tree = HuffmanTree::build(&FrequencyModel::from_text(&s))?;

    for (symbol, code) in CodeTable::derive(&tree).iter() {
        println!("{:>5} {}", symbol.to_string(), render_bits(code));
    }

    let out = Encoder::from(&tree).encode(s.bytes())?;
    let dec = String::from_utf8(Decoder::from(tree).decode(&out)?);

    println!("{} bits: {}", out.len(), render_bits(&out));
    println!("{:?}", dec);
    Ok(())
}
