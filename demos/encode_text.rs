use huffpack::{FrequencyTable, HuffmanTree};

fn main() {
    let s = String::from("Hello my name is Sam!");
    let frequencies = FrequencyTable::from_bytes(s.as_bytes()).frequencies();
    let Some(tree) = HuffmanTree::new(&frequencies) else {
        return;
    };
    let table = tree.table();

    for (byte, code) in table.iter() {
        let bits: String = code.iter().by_vals().map(|b| if b { '1' } else { '0' }).collect();
        println!("{:?} {}", byte as char, bits);
    }

    println!("{:?}", table.payload_bits(&frequencies));
}
