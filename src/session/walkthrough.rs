use rand::Rng;
use serde::Serialize;
use tracing::debug;

use super::animation::{
    convolution_frames, elementwise_frames, transform_frames, Animation, Frame, FrameSink,
    TransformLayout,
};
use super::state::WinogradState;
use super::steps::Step;
use crate::config::{AnimationConfig, Config};
use crate::conv::{Transform, WinogradEngine};
use crate::error::Result;
use crate::matrix::Matrix;

/// What a step puts on screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StepView {
    Originals { input: Matrix, filter: Matrix },
    Constants { b: Matrix, g: Matrix, a: Matrix },
    InputTransform(Transform),
    FilterTransform(Transform),
    Elementwise { u: Matrix, v: Matrix, m: Matrix },
    InverseTransform(Transform),
    DirectConvolution { input: Matrix, filter: Matrix, output: Matrix },
}

/// Presentation-side session: the current step, the input/filter state and
/// the animation for the step on screen.
#[derive(Debug, Clone)]
pub struct Walkthrough {
    engine: WinogradEngine,
    timing: AnimationConfig,
    state: WinogradState,
    step: Step,
    animation: Option<Animation>,
}

impl Default for Walkthrough {
    fn default() -> Self {
        Walkthrough::new(Config::default())
    }
}

impl Walkthrough {
    pub fn new(config: Config) -> Self {
        Walkthrough::with_state(config, WinogradState::default())
    }

    pub fn with_state(config: Config, state: WinogradState) -> Self {
        Walkthrough {
            engine: WinogradEngine::with_config(config.engine),
            timing: config.animation,
            state,
            step: Step::Originals,
            animation: None,
        }
    }

    pub fn engine(&self) -> &WinogradEngine {
        &self.engine
    }

    pub fn state(&self) -> &WinogradState {
        &self.state
    }

    pub fn current_step(&self) -> Step {
        self.step
    }

    pub fn animation(&self) -> Option<&Animation> {
        self.animation.as_ref()
    }

    /// Advance one step; stays put on the last step.
    pub fn next(&mut self) -> Result<Step> {
        self.stop_animation();
        if let Some(step) = self.step.next() {
            self.enter(step)?;
        }
        Ok(self.step)
    }

    /// Go back one step; stays put on the first step.
    pub fn prev(&mut self) -> Result<Step> {
        self.stop_animation();
        if let Some(step) = self.step.prev() {
            self.enter(step)?;
        }
        Ok(self.step)
    }

    /// Jump directly to step `index` (0-based).
    pub fn select(&mut self, index: usize) -> Result<Step> {
        let step = Step::from_index(index)?;
        if step != self.step {
            self.enter(step)?;
        }
        Ok(self.step)
    }

    /// Back to the first step with the default input and filter.
    pub fn reset(&mut self) {
        debug!("walkthrough reset");
        self.animation = None;
        self.step = Step::Originals;
        self.state.reset();
    }

    /// New random input and filter. The step is kept; any animation built
    /// from the old values is dropped, except on the direct convolution step
    /// where it restarts with the new values.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        self.state.randomize_all(rng);
        self.animation = self.entry_animation(self.step)?;
        Ok(())
    }

    pub fn view(&self) -> Result<StepView> {
        let input = self.state.input();
        let filter = self.state.filter();
        let view = match self.step {
            Step::Originals => StepView::Originals {
                input: input.clone(),
                filter: filter.clone(),
            },
            Step::Constants => StepView::Constants {
                b: self.engine.b().clone(),
                g: self.engine.g().clone(),
                a: self.engine.a().clone(),
            },
            Step::InputTransform => StepView::InputTransform(self.engine.transform_input(input)?),
            Step::FilterTransform => StepView::FilterTransform(self.engine.transform_filter(filter)?),
            Step::Elementwise => {
                let u = self.engine.transform_input(input)?.result;
                let v = self.engine.transform_filter(filter)?.result;
                let m = self.engine.elementwise_product(&u, &v)?;
                StepView::Elementwise { u, v, m }
            }
            Step::InverseTransform => {
                let pipeline = self.engine.run(input, filter)?;
                StepView::InverseTransform(pipeline.inverse_transform)
            }
            Step::DirectConvolution => StepView::DirectConvolution {
                input: input.clone(),
                filter: filter.clone(),
                output: self.engine.direct_convolve(input, filter)?,
            },
        };
        Ok(view)
    }

    /// Play/pause button: pauses a running animation, resumes a paused one,
    /// otherwise starts the current step's animation from the top.
    ///
    /// Returns whether an animation is now playing.
    pub fn animate(&mut self) -> Result<bool> {
        if let Some(anim) = self.animation.as_mut() {
            if !anim.is_finished() {
                return Ok(anim.toggle());
            }
        }
        self.animation = self.build_animation(self.step)?;
        Ok(match self.animation.as_mut() {
            Some(anim) => {
                anim.play();
                anim.is_playing()
            }
            None => false,
        })
    }

    /// Advance the current animation by one frame, if one is playing.
    pub fn tick(&mut self) -> Option<&Frame> {
        self.animation.as_mut()?.tick()
    }

    /// Play the current animation to completion, delivering frames to `sink`.
    pub fn run_animation<S: FrameSink + ?Sized>(
        &mut self,
        sink: &mut S,
        wait: impl FnMut(std::time::Duration),
    ) -> usize {
        match self.animation.as_mut() {
            Some(anim) => anim.run(sink, wait),
            None => 0,
        }
    }

    fn stop_animation(&mut self) {
        if let Some(anim) = self.animation.as_mut() {
            anim.pause();
        }
    }

    fn enter(&mut self, step: Step) -> Result<()> {
        let animation = self.entry_animation(step)?;
        debug!(from = self.step.index(), to = step.index(), "step change");
        self.step = step;
        self.animation = animation;
        Ok(())
    }

    /// The animation that plays as soon as `step` is shown, if any.
    fn entry_animation(&self, step: Step) -> Result<Option<Animation>> {
        if step != Step::DirectConvolution {
            return Ok(None);
        }
        let mut anim = self.build_animation(step)?;
        if let Some(anim) = anim.as_mut() {
            anim.play();
        }
        Ok(anim)
    }

    fn build_animation(&self, step: Step) -> Result<Option<Animation>> {
        let input = self.state.input();
        let filter = self.state.filter();
        let anim = match step {
            Step::Originals | Step::Constants => None,
            Step::InputTransform => Some(Animation::new(
                transform_frames(&self.engine.transform_input(input)?, &TransformLayout::INPUT)?,
                self.timing.transform_interval(),
            )),
            Step::FilterTransform => Some(Animation::new(
                transform_frames(&self.engine.transform_filter(filter)?, &TransformLayout::FILTER)?,
                self.timing.transform_interval(),
            )),
            Step::Elementwise => {
                let pipeline = self.engine.run(input, filter)?;
                Some(Animation::new(
                    elementwise_frames(&pipeline.product),
                    self.timing.elementwise_interval(),
                ))
            }
            Step::InverseTransform => {
                let pipeline = self.engine.run(input, filter)?;
                Some(Animation::new(
                    transform_frames(&pipeline.inverse_transform, &TransformLayout::INVERSE)?,
                    self.timing.transform_interval(),
                ))
            }
            Step::DirectConvolution => Some(Animation::new(
                convolution_frames(input, filter)?,
                self.timing.convolution_interval(),
            )),
        };
        Ok(anim)
    }
}
