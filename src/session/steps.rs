use std::fmt;

use serde::Serialize;

use crate::error::{Result, WinogradError};

/// The seven stages of the walkthrough, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Step {
    Originals,
    Constants,
    InputTransform,
    FilterTransform,
    Elementwise,
    InverseTransform,
    DirectConvolution,
}

impl Step {
    pub const ALL: [Step; 7] = [
        Step::Originals,
        Step::Constants,
        Step::InputTransform,
        Step::FilterTransform,
        Step::Elementwise,
        Step::InverseTransform,
        Step::DirectConvolution,
    ];

    pub const LAST: Step = Step::DirectConvolution;

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Result<Step> {
        Step::ALL
            .get(index)
            .copied()
            .ok_or(WinogradError::StepOutOfRange {
                step: index,
                last: Step::LAST.index(),
            })
    }

    pub fn next(self) -> Option<Step> {
        Step::ALL.get(self.index() + 1).copied()
    }

    pub fn prev(self) -> Option<Step> {
        self.index().checked_sub(1).map(|i| Step::ALL[i])
    }

    /// Steps with a play/pause transformation animation.
    pub fn has_transform_animation(self) -> bool {
        matches!(
            self,
            Step::InputTransform | Step::FilterTransform | Step::Elementwise | Step::InverseTransform
        )
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::Originals => "Step 1: Original input (4x4) and filter (3x3)",
            Step::Constants => "Step 2: View transformation matrices (B, G, A)",
            Step::InputTransform => "Step 3: Transform input using B matrices",
            Step::FilterTransform => "Step 4: Transform filter using G matrices",
            Step::Elementwise => "Step 5: Element-wise multiplication",
            Step::InverseTransform => "Step 6: Final output after inverse transform using A",
            Step::DirectConvolution => "Step 7: Direct convolution animation (for comparison)",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Step::Originals => {
                "We start with an input matrix of size 4x4 and a filter (kernel) of size 3x3. \
                 The Winograd algorithm will compute a 2x2 output using matrix transformations \
                 to reduce multiplications."
            }
            Step::Constants => {
                "B matrix (4x4) transforms the input tile, G matrix (4x3) transforms the filter \
                 and A matrix (2x4) performs the inverse transform. These matrices are designed \
                 to minimize the number of multiplications needed."
            }
            Step::InputTransform => {
                "To transform the input, we compute U = B x Input x B^T. This puts the input \
                 into a form that allows efficient computation."
            }
            Step::FilterTransform => {
                "Similarly, we transform the filter with V = G x Filter x G^T. This prepares the \
                 filter for element-wise multiplication rather than traditional convolution."
            }
            Step::Elementwise => {
                "Instead of sliding the filter and computing sums of products, we multiply the \
                 transformed matrices element-wise: M = U (.) V. This reduces the number of \
                 multiplications needed."
            }
            Step::InverseTransform => {
                "Finally, we compute the output with Output = A x M x A^T. This transforms the \
                 intermediate result back to the output space."
            }
            Step::DirectConvolution => {
                "For comparison, traditional convolution slides the 3x3 kernel over the 4x4 \
                 input, computing each output element with 9 multiplications and additions."
            }
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trips() {
        for (i, step) in Step::ALL.iter().enumerate() {
            assert_eq!(step.index(), i);
            assert_eq!(Step::from_index(i).unwrap(), *step);
        }
    }

    #[test]
    fn ends_saturate() {
        assert_eq!(Step::Originals.prev(), None);
        assert_eq!(Step::LAST.next(), None);
        assert_eq!(Step::Constants.prev(), Some(Step::Originals));
    }

    #[test]
    fn from_index_out_of_range() {
        assert_eq!(
            Step::from_index(7),
            Err(WinogradError::StepOutOfRange { step: 7, last: 6 })
        );
    }

    #[test]
    fn only_middle_steps_animate_transforms() {
        let animated: Vec<usize> = Step::ALL
            .iter()
            .filter(|s| s.has_transform_animation())
            .map(|s| s.index())
            .collect();
        assert_eq!(animated, vec![2, 3, 4, 5]);
    }
}
