use argh::FromArgs;
use std::str::FromStr;

mod convert;
mod serial;
mod stream;

/// MiraOS developer tools.
#[derive(FromArgs)]
struct Cli {
    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Encode(convert::Encode),
    Decode(convert::Decode),
    Stream(stream::Stream),
    Serial(serial::Serial),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Png,
    Jpg,
    Bmp,
}

impl FromStr for Format {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        #[rustfmt::skip]
        let Some(format) = s.eq_ignore_ascii_case("png").then_some(Format::Png)
               .or_else(|| s.eq_ignore_ascii_case("jpg").then_some(Format::Jpg))
               .or_else(|| s.eq_ignore_ascii_case("jpeg").then_some(Format::Jpg))
               .or_else(|| s.eq_ignore_ascii_case("bmp").then_some(Format::Bmp))
        else { return Err("invalid format, expected png, jpg or bmp"); };

        Ok(format)
    }
}

impl From<Format> for image::ImageFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Png => image::ImageFormat::Png,
            Format::Jpg => image::ImageFormat::Jpeg,
            Format::Bmp => image::ImageFormat::Bmp,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Cli { command } = argh::from_env();

    match command {
        Command::Encode(options) => convert::encode(options),
        Command::Decode(options) => convert::decode(options),
        Command::Stream(options) => stream::run(options),
        Command::Serial(options) => serial::run(options),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_formats() {
        assert_eq!("PNG".parse::<Format>(), Ok(Format::Png));
        assert_eq!("jpeg".parse::<Format>(), Ok(Format::Jpg));
        assert_eq!("bmp".parse::<Format>(), Ok(Format::Bmp));
        assert!("gif".parse::<Format>().is_err());
    }
}
