use bindarg::{BindingParser, Record};

#[derive(Debug, Record)]
struct Parameters {
    #[binding(sep = ",", help = "The items to sum.")]
    items: Vec<u32>,
}

fn main() {
    let (parameters,) = BindingParser::for_records::<(Parameters,)>("summer").parse::<(Parameters,)>();
    let sum: u32 = parameters.items.iter().sum();
    println!("Sum: {sum}");
}
