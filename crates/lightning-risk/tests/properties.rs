//! Property tests for the assessment model

use lightning_risk::evaluator::{combined_coefficient, tolerable_frequency};
use lightning_risk::{
    compute_collection_area, evaluate, CategoricalCoefficient, ConsequenceCoefficient,
    ConstructionSelection, ContentsCoefficient, FlashDensityBand, LengthUnit, LocationCoefficient,
    OccupancyCoefficient, RiskCoefficients, StructureDimensions,
};
use proptest::prelude::*;

fn dimension() -> impl Strategy<Value = f64> {
    1.0f64..2_000.0
}

fn growth() -> impl Strategy<Value = f64> {
    0.01f64..500.0
}

fn any_coefficients() -> impl Strategy<Value = RiskCoefficients> {
    (
        0..ConstructionSelection::options().len(),
        0..ContentsCoefficient::ALL.len(),
        0..OccupancyCoefficient::ALL.len(),
        0..ConsequenceCoefficient::ALL.len(),
        0..LocationCoefficient::ALL.len(),
    )
        .prop_map(|(c2, c3, c4, c5, cd)| RiskCoefficients {
            construction: ConstructionSelection::options()[c2],
            contents: ContentsCoefficient::ALL[c3],
            occupancy: OccupancyCoefficient::ALL[c4],
            consequence: ConsequenceCoefficient::ALL[c5],
            location: LocationCoefficient::ALL[cd],
        })
}

fn any_band() -> impl Strategy<Value = FlashDensityBand> {
    (0..FlashDensityBand::ALL.len()).prop_map(|i| FlashDensityBand::ALL[i])
}

proptest! {
    #[test]
    fn area_increases_with_length(l in dimension(), w in dimension(), h in dimension(), d in growth()) {
        let base = compute_collection_area(l, w, h, LengthUnit::Feet).unwrap();
        let grown = compute_collection_area(l + d, w, h, LengthUnit::Feet).unwrap();
        prop_assert!(grown > base);
    }

    #[test]
    fn area_increases_with_width(l in dimension(), w in dimension(), h in dimension(), d in growth()) {
        let base = compute_collection_area(l, w, h, LengthUnit::Feet).unwrap();
        let grown = compute_collection_area(l, w + d, h, LengthUnit::Feet).unwrap();
        prop_assert!(grown > base);
    }

    #[test]
    fn area_increases_with_height(l in dimension(), w in dimension(), h in dimension(), d in growth()) {
        let base = compute_collection_area(l, w, h, LengthUnit::Feet).unwrap();
        let grown = compute_collection_area(l, w, h + d, LengthUnit::Feet).unwrap();
        prop_assert!(grown > base);
    }

    #[test]
    fn area_is_unit_independent(l in dimension(), w in dimension(), h in dimension()) {
        let feet = compute_collection_area(l, w, h, LengthUnit::Feet).unwrap();
        let (lm, wm, hm) = (l * 0.3048, w * 0.3048, h * 0.3048);
        let meters = compute_collection_area(lm, wm, hm, LengthUnit::Meters).unwrap();
        prop_assert!((feet - meters).abs() <= 1e-9 * feet);
    }

    #[test]
    fn non_positive_dimensions_rejected(v in -1_000.0f64..=0.0) {
        prop_assert!(compute_collection_area(v, 10.0, 10.0, LengthUnit::Feet).is_err());
        prop_assert!(compute_collection_area(10.0, v, 10.0, LengthUnit::Feet).is_err());
        prop_assert!(compute_collection_area(10.0, 10.0, v, LengthUnit::Feet).is_err());
    }

    #[test]
    fn needs_lps_iff_expected_exceeds_tolerable(
        l in dimension(),
        w in dimension(),
        h in dimension(),
        coeffs in any_coefficients(),
        band in any_band(),
    ) {
        let dims = StructureDimensions::feet(l, w, h).unwrap();
        let result = evaluate(&dims, &coeffs, band).unwrap();
        prop_assert_eq!(
            result.needs_lps,
            result.expected_threat_occurrence > result.tolerable_frequency
        );
        prop_assert_eq!(
            !result.needs_lps,
            result.expected_threat_occurrence <= result.tolerable_frequency
        );
        prop_assert_eq!(result.needs_lps, result.recommendation.needs_lps());
    }

    #[test]
    fn larger_combined_coefficient_never_relaxes_recommendation(
        l in dimension(),
        w in dimension(),
        h in dimension(),
        coeffs in any_coefficients(),
        band in any_band(),
        contents_idx in 0..ContentsCoefficient::ALL.len(),
    ) {
        // Raising C lowers N_c = 1.5e-3 / C, so an LPS can only become more
        // likely while N_D stays fixed.
        let dims = StructureDimensions::feet(l, w, h).unwrap();
        let bumped_contents = ContentsCoefficient::ALL[contents_idx];
        prop_assume!(bumped_contents.value() > coeffs.contents.value());

        let base = evaluate(&dims, &coeffs, band).unwrap();
        let bumped = RiskCoefficients { contents: bumped_contents, ..coeffs };
        let riskier = evaluate(&dims, &bumped, band).unwrap();

        prop_assert!(riskier.combined_coefficient > base.combined_coefficient);
        prop_assert!(riskier.tolerable_frequency < base.tolerable_frequency);
        prop_assert_eq!(riskier.expected_threat_occurrence, base.expected_threat_occurrence);
        if base.needs_lps {
            prop_assert!(riskier.needs_lps);
        }
    }

    #[test]
    fn tolerable_frequency_defined_for_every_table_combination(coeffs in any_coefficients()) {
        let c = combined_coefficient(coeffs.c2(), coeffs.c3(), coeffs.c4(), coeffs.c5());
        prop_assert!(tolerable_frequency(c).is_ok());
    }
}
