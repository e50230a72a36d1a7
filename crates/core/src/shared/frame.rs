use crate::shared::resolution::Resolution;

/// A single decoded image or video frame: contiguous RGB bytes in row-major
/// order.
///
/// `index` is the frame's position in its source: the sequence position for
/// assembled images, the frame number for sampled video frames.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width, self.height)
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    /// Stretches the frame to `target`, ignoring aspect ratio.
    ///
    /// Returns the frame unchanged when it already matches.
    pub fn resized_to(self, target: Resolution) -> Result<Self, Box<dyn std::error::Error>> {
        if self.resolution() == target {
            return Ok(self);
        }
        let index = self.index;
        let img = self.into_rgb_image()?;
        let resized = image::imageops::resize(
            &img,
            target.width,
            target.height,
            image::imageops::FilterType::Triangle,
        );
        Ok(Self::from_rgb_image(resized, index))
    }

    pub fn into_rgb_image(self) -> Result<image::RgbImage, Box<dyn std::error::Error>> {
        if self.channels != 3 {
            return Err(format!("expected 3 channels, frame has {}", self.channels).into());
        }
        image::RgbImage::from_raw(self.width, self.height, self.data)
            .ok_or_else(|| "frame data does not match its dimensions".into())
    }

    pub fn from_rgb_image(img: image::RgbImage, index: usize) -> Self {
        let (width, height) = img.dimensions();
        Self::new(img.into_raw(), width, height, 3, index)
    }
}
