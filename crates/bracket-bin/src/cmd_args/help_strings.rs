pub static MERGE_HELP: &str = "Fusion strategy used to merge exposures

debevec weights every pixel by how well exposed it is and divides
by the exposure time read from EXIF, producing a radiance image.

mertens blends the exposures directly by local contrast, saturation
and well-exposedness. It needs no exposure times.";

pub static TONEMAP_HELP: &str = "Operator compressing the radiance image to a displayable one

Every operator first normalizes the radiance to [0,1] and ends
with a gamma curve. Operator specific options are listed under TONEMAP,
passing an option the chosen operator doesn't take is an error.";

pub static BRIGHTNESS_HELP: &str = "Scale the tonemapped image (mantiuk only)

The image is clamped to [0,1] before and after scaling,
values below 1 darken the result.";

pub static APERTURE_HELP: &str = "Normalize exposure times to the aperture of the first image

Each time is multiplied by (N_ref/N)^2, where N_ref is the first
known f-number. Use this when the aperture changed between shots.";

pub static CONFIG_HELP: &str = "Read options from a JSON file

Options passed on the command line override the file.
Example:
{
    \"inputs\": [\"dark.jpg\", \"mid.jpg\", \"bright.jpg\"],
    \"output\": \"out.png\",
    \"merge\": {\"strategy\": \"debevec\"},
    \"tonemap\": {\"operator\": \"mantiuk\", \"contrast\": 1.0}
}";

pub static PROBE_HELP: &str = "Print exposure metadata of the inputs as JSON and exit";
