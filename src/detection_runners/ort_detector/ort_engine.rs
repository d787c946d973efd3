use std::path::{Path, PathBuf};
use std::time::Instant;
use anyhow::Result;
use half::f16;
use ndarray::{Array4, ArrayD};
use ort::{
    execution_providers::{ExecutionProvider,
                          CPUExecutionProvider,
                          CUDAExecutionProvider,
                          TensorRTExecutionProvider},
    session::builder::{GraphOptimizationLevel, SessionBuilder},
    session::{Session, SessionInputValue},
    tensor::TensorElementType,
    value::{Tensor, ValueRef},
};
use crate::common::InferenceDevice;
use crate::data::{ConfigOrt, FsAccess, TimeCalc, CROSS_MARK};
use crate::detection_runners::inference_process::Network;
use crate::error::ModelError;

/// ONNXRuntime Backend
#[derive(Debug)]
pub struct OrtEngine {
    session: Session,
    device: InferenceDevice,
    input_name: String,
    input_dtype: TensorElementType,
    model_width: u32,
    model_height: u32,
    profile: bool,
    infer_time: TimeCalc,
}

impl OrtEngine {
    pub fn new(config: &ConfigOrt) -> Result<Self> {
        if !config.onnx_path.is_file() {
            return Err(ModelError::MissingArtifact(config.onnx_path.clone()).into());
        }

        // build
        if !config.ort_lib_path.is_empty() {
            if !Path::new(&config.ort_lib_path).is_file() {
                return Err(ModelError::MissingArtifact(config.ort_lib_path.clone().into()).into());
            }
            if let Err(e) = ort::init_from(&config.ort_lib_path).commit() {
                anyhow::bail!("Failed to commit ORT: {:?}", e);
            }
        }

        let mut builder = Session::builder()?;

        let mut device = config.device.to_owned();
        match device {
            InferenceDevice::TensorRT(device_id) => {
                Self::build_trt(
                    &mut builder,
                    device_id,
                    config.trt_fp16_enable,
                    config.trt_engine_cache_enable,
                ).unwrap_or_else(|err| {
                    log::warn!("{err}, Using cpu");
                    device = InferenceDevice::CPU;
                })
            }
            InferenceDevice::CUDA(device_id) => {
                Self::build_cuda(&mut builder, device_id).unwrap_or_else(|err| {
                    log::warn!("{err}, Using cpu");
                    device = InferenceDevice::CPU;
                })
            }
            InferenceDevice::CPU => {
                Self::build_cpu(&mut builder)?;
            }
        }

        let session = builder
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(&config.onnx_path)
            .map_err(|err| ModelError::Malformed {
                path: config.onnx_path.clone(),
                reason: err.to_string(),
            })?;

        let input = session.inputs.first().ok_or_else(|| ModelError::Malformed {
            path: config.onnx_path.clone(),
            reason: "model declares no inputs".to_string(),
        })?;
        let input_name = input.name.clone();
        let input_dtype = input.input_type.tensor_type().unwrap_or(TensorElementType::Float32);

        // summary
        log::info!(
            "Backend: ONNXRuntime | Model: {} | Device: {} | Input: {} ({:?}, {}x{}) | Outputs: {}",
            config.onnx_path.display(),
            device,
            input_name,
            input_dtype,
            config.model_width,
            config.model_height,
            session.outputs.len(),
        );

        Ok(Self {
            session,
            device,
            input_name,
            input_dtype,
            model_width: config.model_width,
            model_height: config.model_height,
            profile: config.profile,
            infer_time: TimeCalc::default(),
        })
    }

    fn build_trt(
        builder: &mut SessionBuilder,
        device_id: usize,
        fp16_enable: bool,
        engine_cache_enable: bool,
    ) -> Result<()> {
        let trt = TensorRTExecutionProvider::default()
            .with_device_id(device_id as i32)
            .with_fp16(fp16_enable)
            .with_engine_cache(engine_cache_enable)
            .with_engine_cache_path(Self::trt_cache_path().display());
        if trt.is_available()? {
            match trt.register(builder) {
                Ok(_) => { }
                Err(err) => { anyhow::bail!("{CROSS_MARK} TensorRT initialization failed: {}", err) }
            }
            log::info!("Initial model serialization with TensorRT may take some time...");
            Ok(())
        } else {
            anyhow::bail!("{CROSS_MARK} TensorRT execution provider not available")
        }
    }

    /// `~/.cache/autointell/trt-cache`, or `trt-cache` in the working directory.
    fn trt_cache_path() -> PathBuf {
        FsAccess::Cache.app_file("trt-cache").unwrap_or_else(|_| PathBuf::from("trt-cache"))
    }

    fn build_cuda(builder: &mut SessionBuilder, device_id: usize) -> Result<()> {
        let ep = CUDAExecutionProvider::default()
            .with_device_id(device_id as i32);
        if ep.is_available()? {
            match ep.register(builder) {
                Ok(_) => { }
                Err(err) => { anyhow::bail!("{CROSS_MARK} CUDA initialization failed: {}", err) }
            }
            Ok(())
        } else {
            anyhow::bail!("{CROSS_MARK} CUDA execution provider not available")
        }
    }

    fn build_cpu(builder: &mut SessionBuilder) -> Result<()> {
        let ep = CPUExecutionProvider::default();
        if ep.is_available()? {
            match ep.register(builder) {
                Ok(_) => { }
                Err(err) => { anyhow::bail!("{CROSS_MARK} CPU initialization failed: {}", err) }
            }
            Ok(())
        } else {
            anyhow::bail!("{CROSS_MARK} CPU execution provider not available")
        }
    }

    fn tensor_preprocess(x: Array4<f32>, dtype: &TensorElementType) -> Result<SessionInputValue<'static>> {
        let x: SessionInputValue<'static> = match dtype {
            TensorElementType::Float32 => Tensor::from_array(x)?.into(),
            TensorElementType::Float16 => Tensor::from_array(x.mapv(f16::from_f32))?.into(),
            _ => anyhow::bail!("Unsupported model input type: {:?}", dtype),
        };
        Ok(x)
    }

    fn tensor_postprocess(name: &str, x: &ValueRef<'_>) -> Result<ArrayD<f32>> {
        if let Ok(y) = x.try_extract_array::<f32>() {
            return Ok(y.into_owned());
        }
        match x.try_extract_array::<f16>() {
            Ok(y) => Ok(y.mapv(f16::to_f32)),
            Err(err) => anyhow::bail!("Unsupported ort output `{}`: {}", name, err),
        }
    }

    pub fn engine_run(&mut self, xs: Array4<f32>) -> Result<Vec<ArrayD<f32>>> {
        // alignment
        let t_pre = Instant::now();
        let x = Self::tensor_preprocess(xs, &self.input_dtype)?;
        let t_pre = t_pre.elapsed();
        self.infer_time.add_or_push(0, t_pre);

        // run
        let t_run = Instant::now();
        let outputs = self.session.run(ort::inputs![self.input_name.as_str() => x])?;
        let t_run = t_run.elapsed();
        self.infer_time.add_or_push(1, t_run);

        // extract
        let t_post = Instant::now();
        let mut ys = Vec::with_capacity(outputs.len());
        for (name, y) in outputs.iter() {
            ys.push(Self::tensor_postprocess(name, &y)?);
        }
        let t_post = t_post.elapsed();
        self.infer_time.add_or_push(2, t_post);
        self.infer_time.finish_run();

        if self.profile {
            let len = 10usize;
            let n = 4usize;
            log::info!("[Profile] {:>len$.n$?} ({:?} avg) [alignment: {:>len$.n$?} | inference: {:>len$.n$?} | to_f32: {:>len$.n$?}]",
                t_pre + t_run + t_post,
                self.infer_time.avg(),
                t_pre,
                t_run,
                t_post,
            );
        }
        Ok(ys)
    }

    /// Provider the session actually runs on, after any CPU fallback.
    pub fn device(&self) -> &InferenceDevice {
        &self.device
    }
}

impl Network for OrtEngine {
    fn input_size(&self) -> (u32, u32) {
        (self.model_width, self.model_height)
    }

    fn forward(&mut self, input: Array4<f32>) -> Result<Vec<ArrayD<f32>>> {
        self.engine_run(input)
    }
}
