//! Grayscale and RGB sweeps built on top of single-channel batches

use super::orchestrator::{BatchOrchestrator, BatchRequest, CancelToken, Progress};
use super::task::Evaluator;
use crate::core_types::{
    Channel, Meters, OpticalField, ResultSequence, RgbField, RgbPattern, SourceImage,
};
use crate::error::Result;
use crate::solver::recombine;
use std::sync::Arc;
use tracing::info;

/// Per-channel sequences of a color sweep plus their stacked composite
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSet {
    /// Red plane at 560 nm
    pub red: ResultSequence,
    /// Green plane at 530 nm
    pub green: ResultSequence,
    /// Blue plane at 430 nm
    pub blue: ResultSequence,
    /// `stack(red[i], green[i], blue[i])` for every index
    pub rgb: ResultSequence<RgbPattern>,
}

impl ChannelSet {
    /// Sequence for one color channel, `None` for [`Channel::Gray`]
    #[must_use]
    pub fn channel(&self, channel: Channel) -> Option<&ResultSequence> {
        match channel {
            Channel::Red => Some(&self.red),
            Channel::Green => Some(&self.green),
            Channel::Blue => Some(&self.blue),
            Channel::Gray => None,
        }
    }
}

/// Output of one sweep over a [`SourceImage`]
#[derive(Debug, Clone, PartialEq)]
pub enum Computation {
    /// Single sequence at the green wavelength
    Grayscale(ResultSequence),
    /// Three channel sequences and their composite
    Rgb(ChannelSet),
}

impl Computation {
    /// Number of distances in the sweep
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Grayscale(seq) => seq.len(),
            Self::Rgb(set) => set.rgb.len(),
        }
    }

    /// True if the sweep had no distances
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Distances in request order
    #[must_use]
    pub fn distances(&self) -> &[f64] {
        match self {
            Self::Grayscale(seq) => seq.distances(),
            Self::Rgb(set) => set.rgb.distances(),
        }
    }
}

impl<E: Evaluator + 'static> BatchOrchestrator<E> {
    /// Sweep a grayscale field at the green wavelength
    ///
    /// # Errors
    ///
    /// See [`BatchOrchestrator::run_batch_with`].
    pub fn run_grayscale(
        &self,
        field: impl Into<Arc<OpticalField>>,
        distances: &[f64],
        aperture: Meters,
        progress: &mut dyn FnMut(Progress),
        cancel: &CancelToken,
    ) -> Result<ResultSequence> {
        let request = BatchRequest::new(field, distances.to_vec(), aperture, Channel::Gray);
        self.run_batch_with(&request, progress, cancel)
    }

    /// Sweep each color plane at its own wavelength and stack the results
    ///
    /// The three batches run one after another; each keeps its own ordering
    /// and fail-fast guarantees, and nothing is returned unless all three
    /// succeed.
    ///
    /// # Errors
    ///
    /// The first channel batch error, or a shape error from recombination.
    pub fn run_rgb(
        &self,
        field: &RgbField,
        distances: &[f64],
        aperture: Meters,
        progress: &mut dyn FnMut(Progress),
        cancel: &CancelToken,
    ) -> Result<ChannelSet> {
        let [red, green, blue] = field.clone().into_channels();

        let mut run = |plane: OpticalField, channel: Channel| {
            let request = BatchRequest::new(plane, distances.to_vec(), aperture, channel);
            self.run_batch_with(&request, progress, cancel)
        };

        let red = run(red, Channel::Red)?;
        let green = run(green, Channel::Green)?;
        let blue = run(blue, Channel::Blue)?;

        let rgb = recombine(&red, &green, &blue)?;
        info!(frames = rgb.len(), "Recombined RGB sequence");

        Ok(ChannelSet {
            red,
            green,
            blue,
            rgb,
        })
    }

    /// Sweep a source image in whichever mode its channel layout calls for
    ///
    /// # Errors
    ///
    /// See [`BatchOrchestrator::run_grayscale`] and [`BatchOrchestrator::run_rgb`].
    pub fn compute(
        &self,
        source: &SourceImage,
        distances: &[f64],
        aperture: Meters,
        progress: &mut dyn FnMut(Progress),
        cancel: &CancelToken,
    ) -> Result<Computation> {
        match source {
            SourceImage::Grayscale(field) => self
                .run_grayscale(field.clone(), distances, aperture, progress, cancel)
                .map(Computation::Grayscale),
            SourceImage::Rgb(rgb) => self
                .run_rgb(rgb, distances, aperture, progress, cancel)
                .map(Computation::Rgb),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::orchestrator::ExecutionMode;
    use crate::batch::task::PropagationTask;
    use crate::core_types::DiffractionPattern;

    /// Writes the wavelength in nanometers into pixel 0 so channels can be told apart.
    struct WavelengthMarker;

    impl Evaluator for WavelengthMarker {
        fn evaluate(&self, task: &PropagationTask) -> Result<DiffractionPattern> {
            let size = task.field.size();
            let mut data = vec![0.0; size * size];
            data[0] = *task.wavelength.to_nanometers();
            data[1] = *task.distance;
            DiffractionPattern::new(size, data)
        }
    }

    fn planes(size: usize) -> RgbField {
        RgbField::new(
            OpticalField::uniform(size, 0.1).unwrap(),
            OpticalField::uniform(size, 0.2).unwrap(),
            OpticalField::uniform(size, 0.3).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_rgb_progress_covers_each_channel() {
        let orchestrator =
            BatchOrchestrator::with_evaluator(WavelengthMarker, ExecutionMode::Sequential).unwrap();

        let mut seen = Vec::new();
        let set = orchestrator
            .run_rgb(
                &planes(2),
                &[0.1, 0.2],
                Meters::new(1e-2),
                &mut |p| seen.push((p.channel, p.completed)),
                &CancelToken::new(),
            )
            .unwrap();

        assert_eq!(
            seen,
            vec![
                (Channel::Red, 1),
                (Channel::Red, 2),
                (Channel::Green, 1),
                (Channel::Green, 2),
                (Channel::Blue, 1),
                (Channel::Blue, 2),
            ]
        );
        assert_eq!(set.rgb.len(), 2);
        assert_eq!(set.channel(Channel::Green), Some(&set.green));
        assert!(set.channel(Channel::Gray).is_none());
    }

    #[test]
    fn test_compute_dispatches_on_source_kind() {
        let orchestrator =
            BatchOrchestrator::with_evaluator(WavelengthMarker, ExecutionMode::Sequential).unwrap();
        let distances = [0.1, 0.2, 0.3];

        let gray = orchestrator
            .compute(
                &SourceImage::Grayscale(OpticalField::uniform(2, 1.0).unwrap()),
                &distances,
                Meters::new(1e-2),
                &mut |_| {},
                &CancelToken::new(),
            )
            .unwrap();
        assert!(matches!(gray, Computation::Grayscale(_)));
        assert_eq!(gray.distances(), &distances);

        let rgb = orchestrator
            .compute(
                &SourceImage::Rgb(planes(2)),
                &distances,
                Meters::new(1e-2),
                &mut |_| {},
                &CancelToken::new(),
            )
            .unwrap();
        assert!(matches!(rgb, Computation::Rgb(_)));
        assert_eq!(rgb.len(), 3);
    }
}
