//! Line-oriented front end for the calculator form.

use crate::core::calculator::ShippingCalculator;
use crate::core::form::{DisplayState, ShippingForm};
use crate::core::render;
use crate::core::ShippingApi;
use crate::domain::model::{DimensionUnit, UnitParseError, WeightUnit};
use crate::utils::error::Result;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

pub const HELP: &str = "\
Commands:
  products               list products
  boxes                  list boxes
  product <name>         select a product (no name clears it)
  box <name>             select a box (no name clears it)
  quantity <n>           set the quantity
  unit <cm|inches>       set the dimension unit
  weight-unit <kg|pounds> set the weight unit
  calculate              submit the current selection
  show                   show the selection and last result
  help                   show this text
  quit                   exit
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Products,
    Boxes,
    Product(String),
    Box(String),
    Quantity(String),
    Unit(DimensionUnit),
    WeightUnit(WeightUnit),
    Calculate,
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}' (type 'help' for a list)")]
    Unknown(String),

    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),

    #[error(transparent)]
    InvalidUnit(#[from] UnitParseError),
}

/// Parses one input line. Blank lines yield `Ok(None)`.
///
/// Only the single separator after the command word is consumed, so
/// names keep any leading or trailing spaces.
pub fn parse_command(line: &str) -> std::result::Result<Option<Command>, CommandError> {
    let line = line.trim_end_matches(['\r', '\n']).trim_start();
    if line.trim_end().is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "products" => Command::Products,
        "boxes" => Command::Boxes,
        "product" => Command::Product(rest.to_string()),
        "box" => Command::Box(rest.to_string()),
        "quantity" | "qty" => Command::Quantity(rest.to_string()),
        "unit" if rest.trim().is_empty() => return Err(CommandError::MissingArgument("unit")),
        "unit" => Command::Unit(rest.parse()?),
        "weight-unit" if rest.trim().is_empty() => {
            return Err(CommandError::MissingArgument("weight-unit"))
        }
        "weight-unit" => Command::WeightUnit(rest.parse()?),
        "calculate" | "calc" => Command::Calculate,
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => return Err(CommandError::Unknown(word.to_string())),
    };

    Ok(Some(command))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Output(String),
    Quit,
}

pub async fn execute<A: ShippingApi>(calculator: &mut ShippingCalculator<A>, command: Command) -> Step {
    let output = match command {
        Command::Calculate => {
            let display = calculator.submit().await;
            render::render_display(display).unwrap_or_default()
        }
        Command::Help => HELP.to_string(),
        Command::Quit => return Step::Quit,
        other => edit_form(calculator.form_mut(), other),
    };
    Step::Output(output)
}

fn edit_form(form: &mut ShippingForm, command: Command) -> String {
    match command {
        Command::Products => render::render_products(form),
        Command::Boxes => render::render_boxes(form),
        Command::Product(name) => {
            form.select_product(&name);
            render::render_selection(form)
        }
        Command::Box(name) => {
            form.select_box(&name);
            render::render_selection(form)
        }
        Command::Quantity(text) => format!("Quantity: {}\n", form.set_quantity_input(&text)),
        Command::Unit(unit) => {
            form.set_dimension_unit(unit);
            format!("Unit (for dimensions): {}\n", unit.label())
        }
        Command::WeightUnit(unit) => {
            form.set_weight_unit(unit);
            format!("Weight Unit: {}\n", unit.label())
        }
        Command::Show => {
            let mut out = render::render_selection(form);
            if let Some(display) = render::render_display(form.display()) {
                out.push('\n');
                out.push_str(&display);
            }
            out
        }
        Command::Calculate | Command::Help | Command::Quit => String::new(),
    }
}

/// Reads commands until `quit` or end of input. Returns the final display.
pub async fn run<A, R, W>(
    calculator: &mut ShippingCalculator<A>,
    reader: R,
    mut writer: W,
) -> Result<DisplayState>
where
    A: ShippingApi,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    writer.write_all(b"> ").await?;
    writer.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let step = match parse_command(&line) {
            Ok(Some(command)) => execute(calculator, command).await,
            Ok(None) => Step::Output(String::new()),
            Err(e) => Step::Output(format!("{}\n", e)),
        };

        match step {
            Step::Output(text) => writer.write_all(text.as_bytes()).await?,
            Step::Quit => break,
        }
        writer.write_all(b"> ").await?;
        writer.flush().await?;
    }

    writer.flush().await?;
    Ok(calculator.form().display().clone())
}
