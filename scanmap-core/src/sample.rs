use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplePlan {
    pub stride: usize,
    pub limit: usize,
}

impl SamplePlan {
    pub fn is_sampled(&self) -> bool {
        self.stride > 1
    }

    pub fn keeps(&self, ordinal: i64) -> bool {
        self.stride <= 1 || ordinal.rem_euclid(self.stride as i64) == 0
    }
}

/// A ceiling of zero disables sampling.
pub fn plan_sample(total_rows: usize, ceiling: usize) -> SamplePlan {
    if ceiling == 0 || total_rows <= ceiling {
        return SamplePlan {
            stride: 1,
            limit: total_rows,
        };
    }
    SamplePlan {
        stride: total_rows.div_ceil(ceiling),
        limit: ceiling,
    }
}
