use super::{DirectRdm, ExcitationGate, RdmSource, StatevectorRdm, MAX_WIRES};
use crate::error::NofError;
use crate::natural_orbitals;

fn h2_double() -> StatevectorRdm {
    StatevectorRdm::new(
        2,
        2,
        vec![ExcitationGate::Double {
            wires: [0, 1, 2, 3],
            param: 0,
        }],
    )
    .unwrap()
}

#[test]
fn test_reference_state_without_rotation() {
    let source = h2_double();
    assert_eq!(source.n_parameters(), 1);

    let state = source.prepare(&[0.0]).unwrap();
    assert_eq!(state.len(), 16);
    assert_eq!(state[0b0011], 1.0);
    assert_eq!(source.measure(&[0.0]).unwrap(), vec![1.0, 0.0, 0.0]);
}

#[test]
fn test_double_excitation_occupations() {
    let theta = 0.22501f64;
    let rdm = h2_double().measure(&[theta]).unwrap();
    let (c, s) = ((theta / 2.0).cos(), (theta / 2.0).sin());

    assert!((rdm[0] - c * c).abs() < 1e-14);
    assert_eq!(rdm[1], 0.0);
    assert!((rdm[2] - s * s).abs() < 1e-14);
}

#[test]
fn test_double_excitation_amplitudes() {
    let theta = 0.7f64;
    let state = h2_double().prepare(&[theta]).unwrap();

    // |1100> -> c|1100> - s|0011> in wire order
    assert!((state[0b0011] - (theta / 2.0).cos()).abs() < 1e-15);
    assert!((state[0b1100] + (theta / 2.0).sin()).abs() < 1e-15);
    let norm: f64 = state.iter().map(|a| a * a).sum();
    assert!((norm - 1.0).abs() < 1e-14);
}

#[test]
fn test_single_excitation_coherence() {
    let source = StatevectorRdm::new(
        2,
        2,
        vec![ExcitationGate::Single {
            wires: [0, 2],
            param: 0,
        }],
    )
    .unwrap();

    let theta = 0.4f64;
    let rdm = source.measure(&[theta]).unwrap();
    assert!((rdm[0] - (theta / 2.0).cos().powi(2)).abs() < 1e-14);
    assert!((rdm[1] - 0.5 * theta.sin()).abs() < 1e-14);
    assert!((rdm[2] - (theta / 2.0).sin().powi(2)).abs() < 1e-14);

    // still a single determinant in the alpha channel
    let basis = natural_orbitals::decompose(&rdm).unwrap();
    assert!((basis.occupations[0] - 1.0).abs() < 1e-12);
    assert!(basis.occupations[1].abs() < 1e-12);
}

#[test]
fn test_trace_counts_alpha_electrons() {
    let gates = vec![
        ExcitationGate::Double {
            wires: [2, 3, 4, 5],
            param: 0,
        },
        ExcitationGate::Single {
            wires: [0, 4],
            param: 1,
        },
        ExcitationGate::Double {
            wires: [0, 1, 4, 5],
            param: 2,
        },
    ];
    let source = StatevectorRdm::new(3, 4, gates).unwrap();
    let rdm = source.measure(&[0.3, -0.2, 0.15]).unwrap();

    let gamma = natural_orbitals::unpack_triangular(&rdm).unwrap();
    assert!((gamma.trace() - 2.0).abs() < 1e-12);

    let basis = natural_orbitals::decompose(&rdm).unwrap();
    assert!(basis.occupations.iter().all(|n| *n > -1e-12 && *n < 1.0 + 1e-12));
}

#[test]
fn test_gate_validation() {
    let out_of_range = StatevectorRdm::new(
        2,
        2,
        vec![ExcitationGate::Single {
            wires: [0, 4],
            param: 0,
        }],
    );
    assert!(matches!(out_of_range, Err(NofError::InvalidGate(_))));

    let repeated = StatevectorRdm::new(
        2,
        2,
        vec![ExcitationGate::Double {
            wires: [0, 1, 1, 3],
            param: 0,
        }],
    );
    assert!(matches!(repeated, Err(NofError::InvalidGate(_))));

    let too_many = StatevectorRdm::new(1, 3, Vec::new());
    assert!(matches!(
        too_many,
        Err(NofError::InvalidElectronCount { .. })
    ));
}

#[test]
fn test_parameter_count_is_checked() {
    assert_eq!(
        h2_double().measure(&[0.1, 0.2]),
        Err(NofError::ParameterMismatch {
            expected: 1,
            found: 2
        })
    );

    let direct = DirectRdm::new(2, 1, |p: &[f64]| vec![1.0 - p[0], 0.0, p[0]]);
    assert_eq!(direct.norb(), 2);
    assert_eq!(direct.measure(&[0.25]).unwrap(), vec![0.75, 0.0, 0.25]);
    assert!(direct.measure(&[]).is_err());
}

#[test]
fn test_gate_yaml_representation() {
    let yaml = "\
- kind: double
  wires: [0, 1, 2, 3]
  param: 0
- kind: single
  wires: [0, 2]
  param: 1
";
    let gates: Vec<ExcitationGate> = serde_yml::from_str(yaml).unwrap();
    assert_eq!(
        gates,
        vec![
            ExcitationGate::Double {
                wires: [0, 1, 2, 3],
                param: 0
            },
            ExcitationGate::Single {
                wires: [0, 2],
                param: 1
            },
        ]
    );
}

#[test]
fn test_register_size_is_bounded() {
    let largest = StatevectorRdm::new(MAX_WIRES / 2, 2, Vec::new()).unwrap();
    assert_eq!(largest.norb(), 12);

    assert_eq!(
        StatevectorRdm::new(MAX_WIRES / 2 + 1, 2, Vec::new()).unwrap_err(),
        NofError::DimensionMismatch {
            what: "statevector wires (maximum)",
            expected: MAX_WIRES,
            found: 26,
        }
    );
    assert!(StatevectorRdm::new(usize::MAX, 2, Vec::new()).is_err());
}
