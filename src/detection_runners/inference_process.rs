use std::time::Instant;
use ndarray::{Array4, ArrayD};
use crate::utils;

/// A forward pass over a preprocessed `[1, 3, h, w]` batch.
///
/// [`OrtEngine`](crate::detection_runners::OrtEngine) is the production
/// implementation. Anything else that can produce YOLO detection-layer
/// outputs can stand in for it.
pub trait Network {
    /// `(width, height)` the network expects.
    fn input_size(&self) -> (u32, u32);

    /// One output array per detection layer.
    fn forward(&mut self, input: Array4<f32>) -> anyhow::Result<Vec<ArrayD<f32>>>;
}

impl<N: Network + ?Sized> Network for Box<N> {
    fn input_size(&self) -> (u32, u32) {
        (**self).input_size()
    }

    fn forward(&mut self, input: Array4<f32>) -> anyhow::Result<Vec<ArrayD<f32>>> {
        (**self).forward(input)
    }
}

pub trait InferenceProcess {
    type Input;
    type Output;

    /// Pre-process the input data.
    fn preprocess(&self, x: &Self::Input) -> anyhow::Result<Array4<f32>>;

    /// Executes the model on the preprocessed data.
    fn inference(&mut self, x: Array4<f32>) -> anyhow::Result<Vec<ArrayD<f32>>>;

    /// Post-process the model's output.
    fn postprocess(&self, ys: Vec<ArrayD<f32>>, x0: &Self::Input, threshold: f32) -> anyhow::Result<Self::Output>;

    /// Executes the full pipeline.
    fn run(&mut self, x: &Self::Input, threshold: f32) -> anyhow::Result<Self::Output> {
        let ys = self.preprocess(x)?;
        let ys = self.inference(ys)?;
        let ys = self.postprocess(ys, x, threshold)?;
        Ok(ys)
    }

    /// Executes the full pipeline, tracing every stage.
    fn forward(&mut self, x: &Self::Input, threshold: f32, profile: bool) -> anyhow::Result<Self::Output> {
        let detect_time = Instant::now();

        let t_pre = Instant::now();
        let ys = self.preprocess(x)?;
        let t_pre = t_pre.elapsed();

        let mut _detect_elapsed = detect_time.elapsed();
        _detect_elapsed = utils::trace("TIME", "Preprocessing input", detect_time, _detect_elapsed);

        let t_exe = Instant::now();
        let ys = self.inference(ys)?;
        let t_exe = t_exe.elapsed();

        _detect_elapsed = utils::trace("TIME", "Detection run", detect_time, _detect_elapsed);

        let t_post = Instant::now();
        let ys = self.postprocess(ys, x, threshold)?;
        let t_post = t_post.elapsed();

        _detect_elapsed = utils::trace("TIME", "Postprocessing", detect_time, _detect_elapsed);

        if profile {
            log::info!("> Preprocess: {t_pre:?} | Inference: {t_exe:?} | Postprocess: {t_post:?}");
        }

        Ok(ys)
    }
}
