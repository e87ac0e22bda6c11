use crate::Format;
use argh::FromArgs;
use image::{DynamicImage, RgbImage};
use mi::{consts::MI_EXTENSION, MiDecoder, MiEncoder, SourceImage};
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

/// Converts an image into a MiraOS `.mi` file, flattening transparency onto black.
#[derive(FromArgs)]
#[argh(subcommand, name = "encode")]
pub struct Encode {
    /// input format, optional (png, jpg, bmp)
    #[argh(option)]
    format: Option<Format>,

    /// the output file, defaults to the input file with a `.mi` extension
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,

    /// the input file. May be a PNG, JPG, or BMP.
    #[argh(positional)]
    input: PathBuf,
}

/// Decodes a `.mi` file into a regular image.
#[derive(FromArgs)]
#[argh(subcommand, name = "decode")]
pub struct Decode {
    /// output format (png, jpg, bmp)
    #[argh(option)]
    format: Format,

    /// the `.mi` input file
    #[argh(positional)]
    input: PathBuf,
    /// the output file
    #[argh(positional)]
    output: PathBuf,
}

/// `logo.png` becomes `logo.mi`, next to the input.
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension(MI_EXTENSION)
}

fn open_image(input: &Path, format: Option<Format>) -> Result<DynamicImage, Box<dyn std::error::Error>> {
    let image = match format {
        Some(format) => {
            image::io::Reader::with_format(BufReader::new(File::open(input)?), format.into())
                .decode()?
        }
        None => image::io::Reader::open(input)?
            .with_guessed_format()?
            .decode()?,
    };

    Ok(image)
}

/// Composites `image` onto black and encodes it as `.mi`.
pub fn encode_image(image: DynamicImage) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let rgba = image.into_rgba8();
    let (width, height) = rgba.dimensions();

    log::info!("Encoding {width}x{height} image");

    let source = SourceImage::new(width as usize, height as usize, rgba.as_raw())?;

    let mut v = Vec::new();
    MiEncoder::encode_to_vec(&source.composite_on_black(), &mut v)?;

    Ok(v)
}

pub fn encode(options: Encode) -> Result<(), Box<dyn std::error::Error>> {
    let Encode {
        format,
        output,
        input,
    } = options;

    let output = output.unwrap_or_else(|| default_output_path(&input));

    let v = encode_image(open_image(&input, format)?)?;

    std::fs::write(&output, &v)?;
    log::info!("Written {} bytes to `{}`", v.len(), output.display());

    Ok(())
}

pub fn decode(options: Decode) -> Result<(), Box<dyn std::error::Error>> {
    let Decode {
        format,
        input,
        output,
    } = options;

    let mi_input = std::fs::read(&input)?;

    log::info!("Decoding `{}`", input.display());

    let mut rgb = Vec::new();
    let mi::HeaderInfo { width, height } = MiDecoder::decode_to_vec(&mi_input, &mut rgb)?;

    RgbImage::from_vec(width, height, rgb)
        .ok_or("failed to create image")?
        .save_with_format(&output, format.into())?;

    log::info!("Written {width}x{height} image to `{}`", output.display());

    Ok(())
}
